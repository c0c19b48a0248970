use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    BuildConfig, RepoCoordinates, DEFAULT_REPO_BRANCH, DEFAULT_REPO_NAME, DEFAULT_REPO_USER,
    REPO_BRANCH_ENV, REPO_NAME_ENV, REPO_USER_ENV,
};
use crate::io::paths::{BuildPaths, DIST_DIR, GENERATED_DIR, PATCHES_DIR};

/// Builds patch archives and the patch registry
#[derive(Parser, Debug)]
#[command(name = "build-registry")]
#[command(version)]
#[command(about = "Packages every patch under patches/ and writes generated/patches.json")]
#[command(
    long_about = "Packages every patch directory into dist/<name>-<version>.zip and writes a JSON registry with raw-content download URLs. Runs `build` when no subcommand is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Repository root; archive entries and download URLs are relative to it
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Patches directory, relative to the root
    #[arg(long, default_value = PATCHES_DIR, global = true)]
    pub patches_dir: PathBuf,

    /// Archive output directory, relative to the root
    #[arg(long, default_value = DIST_DIR, global = true)]
    pub dist_dir: PathBuf,

    /// Registry output directory, relative to the root
    #[arg(long, default_value = GENERATED_DIR, global = true)]
    pub generated_dir: PathBuf,

    /// Account owning the hosted repository
    #[arg(long, env = REPO_USER_ENV, default_value = DEFAULT_REPO_USER, global = true)]
    pub repo_user: String,

    /// Hosted repository name
    #[arg(long, env = REPO_NAME_ENV, default_value = DEFAULT_REPO_NAME, global = true)]
    pub repo_name: String,

    /// Branch the archives are published from
    #[arg(long, env = REPO_BRANCH_ENV, default_value = DEFAULT_REPO_BRANCH, global = true)]
    pub branch: String,

    /// Set log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Package all patches and write the registry (default)
    Build,

    /// Check manifests and descriptions without writing anything
    Validate {
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// The command to run; `build` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Build)
    }

    /// Assemble the build configuration from flags and environment
    pub fn build_config(&self) -> BuildConfig {
        // Keep the given root if it cannot be resolved; discovery reports it
        let root = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());

        let paths = BuildPaths::for_root(root)
            .with_patches_dir(&self.patches_dir)
            .with_dist_dir(&self.dist_dir)
            .with_generated_dir(&self.generated_dir);

        BuildConfig {
            paths,
            repo: RepoCoordinates::new(&self.repo_user, &self.repo_name, &self.branch),
        }
    }
}
