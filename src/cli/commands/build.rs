use tracing::debug;

use super::CommandHandler;
use crate::{BuildConfig, Orchestrator};

/// Handler for the `build` command
pub struct BuildCommand {
    pub config: BuildConfig,
}

impl CommandHandler for BuildCommand {
    fn execute(&self) -> anyhow::Result<()> {
        debug!("Running {} with {:?}", self.name(), self.config);

        let report = Orchestrator::new(self.config.clone()).build()?;

        for archive in &report.archives {
            println!("Archive:  {}", archive.display());
        }
        println!("Registry: {}", report.registry_path.display());
        println!("Patches:  {}", report.descriptors.len());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "build"
    }
}

impl BuildCommand {
    /// Create new build command
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }
}
