//! Patch packaging into `<dist>/<name>-<version>.zip`
//!
//! Entry names are relative to the repository root, so extracting an
//! archive at the root recreates `patches/<patch>/...`. Archives are always
//! rebuilt from scratch.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::ArchiveFailure;
use crate::io::{BuildPaths, PathUtils};
use crate::{BuildError, Result};

/// Package `patch_dir` for `name`/`version` and return the archive path
pub fn build_archive(
    paths: &BuildPaths,
    patch_dir: &Path,
    name: &str,
    version: &str,
) -> Result<PathBuf> {
    let archive_path = paths.archive_file(name, version);
    let wrap = |source: ArchiveFailure| BuildError::ArchiveIo {
        patch: name.to_string(),
        path: archive_path.clone(),
        source,
    };

    info!("Packaging {:?} -> {:?}", patch_dir, archive_path);

    std::fs::create_dir_all(&paths.dist_dir).map_err(|e| wrap(e.into()))?;

    if archive_path.exists() {
        debug!("Removing previous archive {:?}", archive_path);
        std::fs::remove_file(&archive_path).map_err(|e| wrap(e.into()))?;
    }

    match write_archive(&paths.root, patch_dir, &archive_path) {
        Ok(entries) => {
            debug!("Wrote {} entries to {:?}", entries, archive_path);
            Ok(archive_path)
        }
        Err(source) => {
            // Leave nothing half-written behind
            let _ = std::fs::remove_file(&archive_path);
            Err(wrap(source))
        }
    }
}

/// Entry names for every regular file under `patch_dir`, sorted.
///
/// Symlinks to files are packaged with their target's content under the
/// link's own name. Symlinked directories are not descended into.
pub fn archive_entries(
    root: &Path,
    patch_dir: &Path,
) -> std::result::Result<Vec<(String, PathBuf)>, ArchiveFailure> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(patch_dir).sort_by_file_name() {
        let entry = entry?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let path = entry.into_path();
        let name = PathUtils::relative_posix(&path, root).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is outside the repository root", path.display()),
            )
        })?;
        entries.push((name, path));
    }

    Ok(entries)
}

fn write_archive(
    root: &Path,
    patch_dir: &Path,
    archive_path: &Path,
) -> std::result::Result<usize, ArchiveFailure> {
    let entries = archive_entries(root, patch_dir)?;

    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    for (name, path) in &entries {
        writer.start_file(name.as_str(), entry_options())?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
    }

    let mut inner = writer.finish()?;
    io::Write::flush(&mut inner)?;

    Ok(entries.len())
}

/// Deflate with a fixed timestamp so identical inputs give identical archives
fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}
