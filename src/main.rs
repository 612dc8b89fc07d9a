//! segmerge
//!
//! Batch tool that joins multi-part video recordings, one output per folder,
//! using ffmpeg's concat demuxer with stream copy.
//!
//! # Usage
//!
//! ```bash
//! segmerge merge ./recordings ./merged
//! segmerge scan ./recordings ./merged --probe
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use segmerge_cli::adapters::TracingLogAdapter;
use segmerge_cli::cli::{commands, Cli, Commands};
use segmerge_cli::config_initialization::{self, RunSettings};
use segmerge_cli::ports::LogPort;
use segmerge_cli::utils::logging::LoggingSystem;

/// Main entry point for the segmerge CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let logging = LoggingSystem::new(settings.logging_config());
    let handle = logging.initialize();
    logging.log_system_info(&handle);
    config_initialization::log_effective_configuration(&settings);

    let log_port: Arc<dyn LogPort> = Arc::new(TracingLogAdapter::new());

    let result = run(&cli, &settings, log_port).await;
    let code = match result {
        Ok(()) => {
            info!("segmerge finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    };

    drop(handle);
    code
}

fn resolve_settings(cli: &Cli) -> Result<RunSettings> {
    let working_dir = std::env::current_dir()?;
    Ok(config_initialization::resolve_settings(cli, &working_dir)?)
}

/// Execute the requested command
async fn run(cli: &Cli, settings: &RunSettings, log_port: Arc<dyn LogPort>) -> Result<()> {
    match &cli.command {
        Commands::Merge(args) => {
            info!("Executing merge command");
            commands::merge(args, settings, log_port).await
        }
        Commands::Scan(args) => {
            info!("Executing scan command");
            commands::scan(args, settings, log_port).await
        }
    }
}
