//! Patch discovery
//!
//! Every immediate, non-hidden subdirectory of the patches root is a patch.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::io::PathUtils;
use crate::{BuildError, Result};

/// List patch directories under `dir`, ordered by directory name
pub fn scan_patches(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BuildError::RootMissing {
            path: dir.to_path_buf(),
        });
    }

    info!("Scanning for patches in: {:?}", dir);

    let unreadable = |source: std::io::Error| BuildError::RootUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut patch_dirs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();

        if !path.is_dir() {
            debug!("Skipping non-directory entry: {:?}", path);
            continue;
        }
        if PathUtils::is_hidden(&path) {
            debug!("Skipping hidden directory: {:?}", path);
            continue;
        }

        patch_dirs.push(path);
    }

    patch_dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    info!("Scan complete: found {} patch directories", patch_dirs.len());

    Ok(patch_dirs)
}
