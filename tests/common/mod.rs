//! Test helpers shared by the integration tests
//!
//! Builds throwaway repositories with a `patches/` tree inside a temp dir.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use patch_registry::{BuildConfig, RepoCoordinates};

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Create `patches/<dir>` with a manifest and a payload file
pub fn create_patch(root: &Path, dir: &str, manifest: &str) -> PathBuf {
    let patch_dir = root.join("patches").join(dir);
    fs::create_dir_all(&patch_dir).unwrap();
    fs::write(patch_dir.join("manifest.yaml"), manifest).unwrap();
    fs::write(
        patch_dir.join("server.py"),
        "import sys\nfor line in sys.stdin:\n    print(line)\n",
    )
    .unwrap();
    patch_dir
}

/// Add a README to an existing patch
pub fn add_readme(patch_dir: &Path, content: &str) {
    fs::write(patch_dir.join("README.md"), content).unwrap();
}

/// The alpha/beta fixture: alpha describes itself, beta relies on its README
pub fn create_alpha_beta(root: &Path) {
    create_patch(
        root,
        "alpha",
        "name: alpha\nversion: 1.0.0\ndescription: Alpha patch\n",
    );
    let beta = create_patch(root, "beta", "name: beta\nversion: 2.1.0\n");
    add_readme(&beta, "# Beta\n\nBeta does things.\n\nMore details.\n");
}

/// Build configuration with fixed repository coordinates
pub fn test_config(root: &Path) -> BuildConfig {
    BuildConfig::for_root(root).with_repo(RepoCoordinates::new(
        "octo",
        "aethercore-patches",
        "main",
    ))
}

/// Sorted (name, content) pairs of every entry in a zip archive
pub fn archive_contents(path: &Path) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        entries.push((entry.name().to_string(), content));
    }
    entries.sort();
    entries
}
