//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::toml_config::{MergerConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::domain::errors::DomainError;
use crate::domain::rules::DurationTolerance;
use crate::error::SegmergeResult;
use crate::ports::LogLevel;
use crate::utils::logging::{LogFormat, LoggingConfig};

/// Log directory used when neither the CLI nor the config file names one
pub const DEFAULT_LOG_DIR: &str = "segmerge-logs";

/// Effective settings of one invocation
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Configuration after CLI and environment overrides
    pub config: MergerConfig,
    pub config_source: Option<PathBuf>,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// `None` disables the run log file
    pub log_dir: Option<PathBuf>,
    pub diagnostics_dir: PathBuf,
    pub output_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl RunSettings {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
            run_log_dir: self.log_dir.clone(),
        }
    }

    pub fn tolerance(&self) -> DurationTolerance {
        DurationTolerance::new(
            self.config.merge.duration_tolerance_secs,
            self.config.merge.duration_tolerance_ratio,
        )
    }
}

/// Resolve settings with precedence CLI > Env > File > Defaults.
///
/// Environment values arrive through the same clap fields as flags.
pub fn resolve_settings(cli: &Cli, working_dir: &Path) -> SegmergeResult<RunSettings> {
    let (mut config, config_source) =
        TomlConfigAdapter::discover(cli.config.as_deref(), working_dir)?;

    apply_cli_overrides(cli, &mut config);
    TomlConfigAdapter::validate(&config)?;

    let default_log_dir = working_dir.join(DEFAULT_LOG_DIR);
    let log_dir = match &cli.command {
        Commands::Merge(_) => Some(
            config
                .paths
                .log_dir
                .clone()
                .unwrap_or_else(|| default_log_dir.clone()),
        ),
        Commands::Scan(_) => None,
    };
    let diagnostics_dir = config
        .paths
        .diagnostics_dir
        .clone()
        .or_else(|| config.paths.log_dir.clone())
        .unwrap_or(default_log_dir);
    let output_dir = config.paths.output_dir.clone().ok_or_else(|| {
        DomainError::BadArgs(
            "no output directory given; pass OUTPUT or set paths.output_dir".to_string(),
        )
    })?;

    Ok(RunSettings {
        log_level: LogLevel::parse(&config.logging.level)?,
        log_format: config.logging.format,
        timeout: config.tools.timeout_secs.map(Duration::from_secs),
        config,
        config_source,
        log_dir,
        diagnostics_dir,
        output_dir,
    })
}

fn apply_cli_overrides(cli: &Cli, config: &mut MergerConfig) {
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    match &cli.command {
        Commands::Merge(args) => {
            if let Some(output) = &args.output {
                config.paths.output_dir = Some(output.clone());
            }
            if let Some(dir) = &args.diagnostics_dir {
                config.paths.diagnostics_dir = Some(dir.clone());
            }
            if let Some(dir) = &args.log_dir {
                config.paths.log_dir = Some(dir.clone());
            }
            if let Some(timeout) = args.timeout {
                config.tools.timeout_secs = Some(timeout);
            }
        }
        Commands::Scan(args) => {
            if let Some(output) = &args.output {
                config.paths.output_dir = Some(output.clone());
            }
        }
    }
}

/// Log where the configuration came from and its effective values
pub fn log_effective_configuration(settings: &RunSettings) {
    match &settings.config_source {
        Some(path) => info!("Configuration file: {}", path.display()),
        None => info!("No configuration file found; using defaults"),
    }
    match TomlConfigAdapter::to_toml_string(&settings.config) {
        Ok(text) => debug!("Effective configuration:\n{}", text),
        Err(e) => debug!("Could not render effective configuration: {}", e),
    }
}
