//! Build orchestration
//!
//! The [`Orchestrator`] walks the patches root and drives every patch
//! through manifest loading, description resolution and packaging, then
//! writes the registry. The first error aborts the whole run: no registry
//! is written and the remaining patches are never visited.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod scanner;

use crate::catalog::description::resolve_with_source;
use crate::catalog::{build_archive, download_url, write_registry};
use crate::catalog::{DescriptionSource, PatchDescriptor, PatchManifest};
use crate::config::BuildConfig;
use crate::{BuildError, Result};

/// Pipeline position of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Discovering,
    Loading,
    Resolving,
    Packaging,
    DescriptorBuilt,
    Writing,
    Done,
    Aborted,
}

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Registry entries in discovery order
    pub descriptors: Vec<PatchDescriptor>,
    /// Archives written, parallel to `descriptors`
    pub archives: Vec<PathBuf>,
    /// Where the registry was written
    pub registry_path: PathBuf,
}

/// A patch that passed manifest validation, as reported by a dry run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedPatch {
    pub directory: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub description_source: DescriptionSource,
}

/// Drives one registry build
pub struct Orchestrator {
    config: BuildConfig,
    state: PipelineState,
}

impl Orchestrator {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
        }
    }

    /// Current pipeline state; `Done` or `Aborted` once a run has finished
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Package every patch and write the registry
    pub fn build(&mut self) -> Result<BuildReport> {
        let result = self.run_build();
        if result.is_err() {
            self.transition(PipelineState::Aborted);
        }
        result
    }

    /// Load and describe every patch without writing anything
    pub fn check(&mut self) -> Result<Vec<CheckedPatch>> {
        let result = self.run_check();
        if result.is_err() {
            self.transition(PipelineState::Aborted);
        }
        result
    }

    fn run_build(&mut self) -> Result<BuildReport> {
        let patch_dirs = self.discover()?;

        let mut descriptors = Vec::with_capacity(patch_dirs.len());
        let mut archives = Vec::with_capacity(patch_dirs.len());
        let mut seen = HashSet::new();

        for patch_dir in &patch_dirs {
            let (descriptor, archive) = self.process_patch(patch_dir)?;

            if !seen.insert((descriptor.name.clone(), descriptor.version.clone())) {
                warn!(
                    "Duplicate patch {} {} in {:?}; {:?} was overwritten",
                    descriptor.name, descriptor.version, patch_dir, archive
                );
            }

            descriptors.push(descriptor);
            archives.push(archive);
        }

        if descriptors.is_empty() {
            warn!(
                "No patches found in {:?}; writing an empty registry",
                self.config.paths.patches_dir
            );
        }

        self.transition(PipelineState::Writing);
        let registry_path = self.config.paths.registry_file();
        write_registry(&registry_path, &descriptors)?;

        self.transition(PipelineState::Done);
        info!("Registry build complete: {} patches", descriptors.len());

        Ok(BuildReport {
            descriptors,
            archives,
            registry_path,
        })
    }

    fn run_check(&mut self) -> Result<Vec<CheckedPatch>> {
        let patch_dirs = self.discover()?;

        let mut checked = Vec::with_capacity(patch_dirs.len());
        for patch_dir in &patch_dirs {
            let manifest = self.load(patch_dir)?;

            self.transition(PipelineState::Resolving);
            let (description, description_source) = resolve_with_source(patch_dir, &manifest);

            checked.push(CheckedPatch {
                directory: crate::catalog::manifest::patch_label(patch_dir),
                name: manifest.name,
                version: manifest.version,
                description,
                description_source,
            });
        }

        if checked.is_empty() {
            warn!("No patches found in {:?}", self.config.paths.patches_dir);
        }

        self.transition(PipelineState::Done);
        Ok(checked)
    }

    fn discover(&mut self) -> Result<Vec<PathBuf>> {
        self.transition(PipelineState::Discovering);
        info!("Repository root: {:?}", self.config.paths.root);

        self.config.paths.validate()?;
        scanner::scan_patches(&self.config.paths.patches_dir)
    }

    fn load(&mut self, patch_dir: &Path) -> Result<PatchManifest> {
        self.transition(PipelineState::Loading);
        info!(
            "Processing patch: {}",
            crate::catalog::manifest::patch_label(patch_dir)
        );
        PatchManifest::from_dir(patch_dir)
    }

    fn process_patch(&mut self, patch_dir: &Path) -> Result<(PatchDescriptor, PathBuf)> {
        let manifest = self.load(patch_dir)?;

        self.transition(PipelineState::Resolving);
        let (description, source) = resolve_with_source(patch_dir, &manifest);
        debug!("Description for {} taken from {:?}", manifest.name, source);

        self.transition(PipelineState::Packaging);
        let paths = &self.config.paths;
        let archive = build_archive(paths, patch_dir, &manifest.name, &manifest.version)?;

        let url = download_url(&self.config.repo, &paths.root, &archive).ok_or_else(|| {
            BuildError::InvalidConfig(format!(
                "archive {} is outside the repository root {}",
                archive.display(),
                paths.root.display()
            ))
        })?;

        self.transition(PipelineState::DescriptorBuilt);
        let descriptor =
            PatchDescriptor::new(manifest.name, manifest.version, description, url);

        Ok((descriptor, archive))
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoCoordinates;
    use tempfile::TempDir;

    fn write_patch(root: &Path, dir: &str, manifest: &str) {
        let patch_dir = root.join("patches").join(dir);
        std::fs::create_dir_all(&patch_dir).unwrap();
        std::fs::write(patch_dir.join("manifest.yaml"), manifest).unwrap();
        std::fs::write(patch_dir.join("server.py"), "print('hi')\n").unwrap();
    }

    fn orchestrator(root: &Path) -> Orchestrator {
        Orchestrator::new(
            BuildConfig::for_root(root).with_repo(RepoCoordinates::new("octo", "repo", "main")),
        )
    }

    #[test]
    fn test_build_reaches_done() {
        let temp_dir = TempDir::new().unwrap();
        write_patch(temp_dir.path(), "echo", "name: echo\nversion: 1.0.0\n");

        let mut orchestrator = orchestrator(temp_dir.path());
        assert_eq!(orchestrator.state(), PipelineState::Idle);

        let report = orchestrator.build().unwrap();
        assert_eq!(orchestrator.state(), PipelineState::Done);
        assert_eq!(report.descriptors.len(), 1);
        assert_eq!(report.archives, vec![temp_dir.path().join("dist/echo-1.0.0.zip")]);
        assert_eq!(
            report.descriptors[0].download_url,
            "https://raw.githubusercontent.com/octo/repo/main/dist/echo-1.0.0.zip"
        );
        assert_eq!(report.descriptors[0].description, "Patch echo");
    }

    #[test]
    fn test_failure_aborts_before_later_patches() {
        let temp_dir = TempDir::new().unwrap();
        write_patch(temp_dir.path(), "a-broken", "name: broken\n");
        write_patch(temp_dir.path(), "b-fine", "name: fine\nversion: 1.0.0\n");

        let mut orchestrator = orchestrator(temp_dir.path());
        let err = orchestrator.build().unwrap_err();

        assert!(matches!(
            err,
            BuildError::ManifestFieldInvalid { field: "version", .. }
        ));
        assert_eq!(orchestrator.state(), PipelineState::Aborted);
        assert!(!temp_dir.path().join("dist/fine-1.0.0.zip").exists());
        assert!(!temp_dir.path().join("generated/patches.json").exists());
    }

    #[test]
    fn test_missing_root_aborts() {
        let temp_dir = TempDir::new().unwrap();

        let mut orchestrator = orchestrator(temp_dir.path());
        let err = orchestrator.build().unwrap_err();

        assert!(matches!(err, BuildError::RootMissing { .. }));
        assert_eq!(orchestrator.state(), PipelineState::Aborted);
    }

    #[test]
    fn test_path_like_name_writes_nothing_outside_dist() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("repo");
        write_patch(&root, "evil", "name: ../../escaped\nversion: 1.0.0\n");

        let mut orchestrator = orchestrator(&root);
        let err = orchestrator.build().unwrap_err();

        assert!(matches!(
            err,
            BuildError::ManifestFieldInvalid { field: "name", .. }
        ));
        assert_eq!(orchestrator.state(), PipelineState::Aborted);
        assert!(!temp_dir.path().join("escaped-1.0.0.zip").exists());
        assert!(!root.join("escaped-1.0.0.zip").exists());
        assert!(!root.join("dist").exists());
        assert!(!root.join("generated").exists());
    }

    #[test]
    fn test_duplicate_name_version_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        write_patch(temp_dir.path(), "one", "name: same\nversion: 1.0.0\n");
        write_patch(temp_dir.path(), "two", "name: same\nversion: 1.0.0\n");

        let report = orchestrator(temp_dir.path()).build().unwrap();
        assert_eq!(report.descriptors.len(), 2);
        assert_eq!(report.descriptors[0], report.descriptors[1]);
    }

    #[test]
    fn test_check_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        write_patch(
            temp_dir.path(),
            "echo",
            "name: echo\nversion: 1.0.0\ndescription: Echo server\n",
        );

        let mut orchestrator = orchestrator(temp_dir.path());
        let checked = orchestrator.check().unwrap();

        assert_eq!(
            checked,
            vec![CheckedPatch {
                directory: "echo".to_string(),
                name: "echo".to_string(),
                version: "1.0.0".to_string(),
                description: "Echo server".to_string(),
                description_source: DescriptionSource::Manifest,
            }]
        );
        assert_eq!(orchestrator.state(), PipelineState::Done);
        assert!(!temp_dir.path().join("dist").exists());
        assert!(!temp_dir.path().join("generated").exists());
    }

    #[test]
    fn test_output_outside_root_is_rejected_before_discovery() {
        let temp_dir = TempDir::new().unwrap();
        write_patch(temp_dir.path(), "echo", "name: echo\nversion: 1.0.0\n");

        let config = BuildConfig::for_root(temp_dir.path());
        let paths = config.paths.clone().with_dist_dir("../dist");
        let mut orchestrator = Orchestrator::new(config.with_paths(paths));

        assert!(matches!(
            orchestrator.build(),
            Err(BuildError::InvalidConfig(_))
        ));
    }
}
