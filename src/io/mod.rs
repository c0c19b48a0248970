pub mod paths;

pub use paths::{BuildPaths, PathUtils};
