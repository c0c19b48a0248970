use std::path::PathBuf;

use crate::io::BuildPaths;

/// Environment variable for the hosting account that owns the repository
pub const REPO_USER_ENV: &str = "AETHERCORE_REPO_USER";

/// Environment variable for the repository name
pub const REPO_NAME_ENV: &str = "AETHERCORE_REPO_NAME";

/// Environment variable for the published branch
pub const REPO_BRANCH_ENV: &str = "AETHERCORE_REPO_BRANCH";

pub const DEFAULT_REPO_USER: &str = "SEU_USER";
pub const DEFAULT_REPO_NAME: &str = "aethercore-patches";
pub const DEFAULT_REPO_BRANCH: &str = "main";

/// Raw-file host serving the published archives
pub const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";

/// Hosted repository the archives are published from.
///
/// Only affects the `download_url` of registry entries, never file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for RepoCoordinates {
    fn default() -> Self {
        Self {
            owner: DEFAULT_REPO_USER.to_string(),
            repo: DEFAULT_REPO_NAME.to_string(),
            branch: DEFAULT_REPO_BRANCH.to_string(),
        }
    }
}

impl RepoCoordinates {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    /// Raw-content URL for a file given by its root-relative, `/`-separated path
    pub fn raw_url(&self, relative_path: &str) -> String {
        format!(
            "{RAW_CONTENT_BASE}/{}/{}/{}/{}",
            self.owner, self.repo, self.branch, relative_path
        )
    }
}

/// Everything a build run needs, constructed once at process entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub paths: BuildPaths,
    pub repo: RepoCoordinates,
}

impl BuildConfig {
    /// Standard layout under `root` with default repository coordinates
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: BuildPaths::for_root(root),
            repo: RepoCoordinates::default(),
        }
    }

    pub fn with_paths(mut self, paths: BuildPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_repo(mut self, repo: RepoCoordinates) -> Self {
        self.repo = repo;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_coordinates() {
        let repo = RepoCoordinates::default();
        assert_eq!(repo.owner, "SEU_USER");
        assert_eq!(repo.repo, "aethercore-patches");
        assert_eq!(repo.branch, "main");
    }

    #[test]
    fn test_raw_url() {
        let repo = RepoCoordinates::new("octo", "patches", "release");
        assert_eq!(
            repo.raw_url("dist/alpha-1.0.0.zip"),
            "https://raw.githubusercontent.com/octo/patches/release/dist/alpha-1.0.0.zip"
        );
    }

    #[test]
    fn test_config_builder() {
        let config = BuildConfig::for_root("/repo")
            .with_repo(RepoCoordinates::new("octo", "patches", "dev"));

        assert_eq!(config.paths.root, PathBuf::from("/repo"));
        assert_eq!(config.repo.branch, "dev");
    }
}
