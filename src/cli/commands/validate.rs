use tracing::debug;

use super::CommandHandler;
use crate::{BuildConfig, Orchestrator};

/// Handler for the `validate` command
pub struct ValidateCommand {
    pub config: BuildConfig,
    pub json: bool,
}

impl CommandHandler for ValidateCommand {
    fn execute(&self) -> anyhow::Result<()> {
        debug!("Running {} with {:?}", self.name(), self.config);

        let checked = Orchestrator::new(self.config.clone()).check()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&checked)?);
            return Ok(());
        }

        for patch in &checked {
            println!(
                "{:<20} {} {} ({}: {})",
                patch.directory,
                patch.name,
                patch.version,
                patch.description_source.as_str(),
                patch.description
            );
        }
        println!("{} patch(es) valid.", checked.len());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "validate"
    }
}

impl ValidateCommand {
    /// Create new validate command
    pub fn new(config: BuildConfig, json: bool) -> Self {
        Self { config, json }
    }
}
