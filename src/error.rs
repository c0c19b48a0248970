use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of a registry build.
///
/// Every variant aborts the run. Messages name the failing patch or path;
/// the underlying cause, when there is one, is exposed through `source()`
/// so callers can print the whole chain on a single line with `{:#}`.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("patches root not found: {}", path.display())]
    RootMissing { path: PathBuf },

    #[error("failed to read patches root {}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest.yaml not found for patch '{patch}' (expected {})", path.display())]
    ManifestMissing { patch: String, path: PathBuf },

    #[error("invalid manifest for patch '{patch}' at {}: {reason}", path.display())]
    ManifestInvalid {
        patch: String,
        path: PathBuf,
        reason: String,
    },

    #[error("invalid field '{field}' in manifest {}: {reason}", path.display())]
    ManifestFieldInvalid {
        field: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("failed to package patch '{patch}' into {}", path.display())]
    ArchiveIo {
        patch: String,
        path: PathBuf,
        #[source]
        source: ArchiveFailure,
    },

    #[error("failed to write registry {}", path.display())]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Low-level cause of an [`BuildError::ArchiveIo`].
#[derive(Error, Debug)]
pub enum ArchiveFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, BuildError>;
