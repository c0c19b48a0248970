//! Build-time configuration
//!
//! A [`BuildConfig`] is assembled once in `main` from CLI flags and the
//! `AETHERCORE_REPO_*` environment variables, then handed to the
//! orchestrator. Nothing in the pipeline reads the environment itself.

pub mod types;

pub use types::{
    BuildConfig, RepoCoordinates, DEFAULT_REPO_BRANCH, DEFAULT_REPO_NAME, DEFAULT_REPO_USER,
    REPO_BRANCH_ENV, REPO_NAME_ENV, REPO_USER_ENV,
};
