//! Registry serialization (generated/patches.json)
//!
//! The registry is a pretty-printed JSON array of [`PatchDescriptor`]s in
//! discovery order. It is written to a sibling temp file and renamed into
//! place, so readers only ever see a complete document.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::RepoCoordinates;
use crate::io::PathUtils;
use crate::{BuildError, Result};

/// One registry entry; field order is the serialized order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub download_url: String,
}

impl PatchDescriptor {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            download_url: download_url.into(),
        }
    }
}

/// Download URL for an archive stored under the repository root.
///
/// Returns `None` when the archive is not below `root`.
pub fn download_url(repo: &RepoCoordinates, root: &Path, archive_path: &Path) -> Option<String> {
    PathUtils::relative_posix(archive_path, root).map(|relative| repo.raw_url(&relative))
}

/// Render descriptors as the registry document (UTF-8, non-ASCII kept as-is)
pub fn to_json(descriptors: &[PatchDescriptor]) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(descriptors)?;
    json.push('\n');
    Ok(json)
}

/// Temp file used while replacing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}

/// Atomically replace the registry at `path` with `descriptors`
pub fn write_registry(path: &Path, descriptors: &[PatchDescriptor]) -> Result<()> {
    info!("Writing {:?} ({} patches)", path, descriptors.len());

    let io_error = |source: std::io::Error| BuildError::RegistryIo {
        path: path.to_path_buf(),
        source,
    };

    let json = to_json(descriptors).map_err(|e| io_error(e.into()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let tmp_path = temp_path_for(path);
    if let Err(e) = write_synced(&tmp_path, json.as_bytes()) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_error(e));
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        io_error(e)
    })
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
