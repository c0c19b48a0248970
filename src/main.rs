use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use patch_registry::cli::commands::{
    build::BuildCommand, validate::ValidateCommand, CommandHandler,
};
use patch_registry::cli::{Cli, Commands, LogLevel};

/// Initialize tracing from CLI flags.
///
/// Logs always go to stderr; stdout is reserved for command output.
fn initialize_tracing(log_level: LogLevel, json: bool) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.build_config();

    let handler: Box<dyn CommandHandler> = match cli.command() {
        Commands::Build => Box::new(BuildCommand::new(config)),
        Commands::Validate { json } => Box::new(ValidateCommand::new(config, json)),
    };

    debug!("Dispatching {} command", handler.name());
    handler.execute()
}

fn main() {
    let cli = Cli::parse();

    initialize_tracing(cli.log_level, cli.log_json);

    match run(&cli) {
        Ok(()) => info!("Done."),
        Err(e) => {
            // One line: message and cause chain
            eprintln!("FATAL: {e:#}");
            std::process::exit(1);
        }
    }
}
