//! Patch registry builder
//!
//! Turns a `patches/` tree into one zip archive per patch under `dist/` and
//! a JSON catalog at `generated/patches.json` whose download URLs point at
//! raw-file hosting of the same repository.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;

pub use config::{BuildConfig, RepoCoordinates};
pub use engine::{BuildReport, Orchestrator, PipelineState};
pub use error::{BuildError, Result};
