use crate::{BuildError, Result};
use std::path::{Component, Path, PathBuf};

/// Default patches directory, relative to the repository root
pub const PATCHES_DIR: &str = "patches";

/// Default archive output directory, relative to the repository root
pub const DIST_DIR: &str = "dist";

/// Default registry output directory, relative to the repository root
pub const GENERATED_DIR: &str = "generated";

/// Registry file name inside the generated directory
pub const REGISTRY_FILE: &str = "patches.json";

/// Path layout of a patch repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Repository root; archive entry names and download URLs are relative to it
    pub root: PathBuf,
    /// One subdirectory per patch (patches/)
    pub patches_dir: PathBuf,
    /// Archive output directory (dist/)
    pub dist_dir: PathBuf,
    /// Registry output directory (generated/)
    pub generated_dir: PathBuf,
}

impl BuildPaths {
    /// Standard layout under a repository root
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            patches_dir: root.join(PATCHES_DIR),
            dist_dir: root.join(DIST_DIR),
            generated_dir: root.join(GENERATED_DIR),
            root,
        }
    }

    /// Override the patches directory (relative paths are resolved against the root)
    pub fn with_patches_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.patches_dir = self.root.join(dir);
        self
    }

    /// Override the archive output directory
    pub fn with_dist_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dist_dir = self.root.join(dir);
        self
    }

    /// Override the registry output directory
    pub fn with_generated_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.generated_dir = self.root.join(dir);
        self
    }

    /// Final registry file path (generated/patches.json)
    pub fn registry_file(&self) -> PathBuf {
        self.generated_dir.join(REGISTRY_FILE)
    }

    /// Archive path for a patch, fully determined by name and version
    pub fn archive_file(&self, name: &str, version: &str) -> PathBuf {
        self.dist_dir.join(format!("{name}-{version}.zip"))
    }

    /// Check that every output location lives inside the repository root.
    ///
    /// Archives are addressed by their root-relative path, so a dist or
    /// generated directory outside the root cannot be published.
    pub fn validate(&self) -> Result<()> {
        for (label, dir) in [
            ("patches", &self.patches_dir),
            ("dist", &self.dist_dir),
            ("generated", &self.generated_dir),
        ] {
            let inside = dir
                .strip_prefix(&self.root)
                .map(PathUtils::is_safe_path)
                .unwrap_or(false);
            if !inside {
                return Err(BuildError::InvalidConfig(format!(
                    "{label} directory {} must be inside the repository root {}",
                    dir.display(),
                    self.root.display()
                )));
            }
        }
        Ok(())
    }
}

/// Utilities for working with paths
pub struct PathUtils;

impl PathUtils {
    /// Check if path is safe (no traversal attacks)
    pub fn is_safe_path(path: &Path) -> bool {
        !path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    }

    /// Hidden entries start with a dot and are never treated as patches
    pub fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .map(|n| n.as_encoded_bytes().starts_with(b"."))
            .unwrap_or(false)
    }

    /// Render `path` relative to `base` with `/` separators on every platform.
    ///
    /// Returns `None` when `path` is not below `base` or still contains
    /// `..` after the prefix.
    pub fn relative_posix(path: &Path, base: &Path) -> Option<String> {
        let relative = path.strip_prefix(base).ok()?;
        let parts = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Option<Vec<String>>>()?;
        Some(parts.join("/"))
    }
}
