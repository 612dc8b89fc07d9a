//! Logging configuration and subscriber setup

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::ports::LogLevel;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Pretty,
    /// Compact text format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!(
                "Invalid log format: {}. Valid formats: pretty, compact, json",
                other
            )),
        }
    }
}

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level; `RUST_LOG` takes precedence when set
    pub level: LogLevel,
    pub format: LogFormat,
    /// Directory for the timestamped run log; `None` disables file logging
    pub run_log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            run_log_dir: None,
        }
    }
}

/// What the installed logging system writes to.
///
/// Keep it alive for the whole run; dropping it flushes the run log.
#[derive(Default)]
pub struct LoggingHandle {
    pub run_log_path: Option<PathBuf>,
    guard: Option<WorkerGuard>,
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    /// Create a new logging system with configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// `segmerge_<YYYYmmdd_HHMMSS>.log`
    pub fn run_log_file_name() -> String {
        format!("segmerge_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
    }

    fn open_run_log(dir: &Path) -> io::Result<(NonBlocking, WorkerGuard, PathBuf)> {
        fs::create_dir_all(dir)?;
        let file_name = Self::run_log_file_name();
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(&file_name)
            .build(dir)
            .map_err(io::Error::other)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        Ok((writer, guard, dir.join(file_name)))
    }

    /// Install the global subscriber: console on stderr plus the optional run log.
    ///
    /// File logging problems are reported on stderr and never abort the run.
    pub fn initialize(&self) -> LoggingHandle {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()));

        let mut handle = LoggingHandle::default();
        let mut run_log = None;
        if let Some(dir) = &self.config.run_log_dir {
            match Self::open_run_log(dir) {
                Ok((writer, guard, path)) => {
                    run_log = Some(writer);
                    handle.guard = Some(guard);
                    handle.run_log_path = Some(path);
                }
                Err(e) => eprintln!(
                    "WARNING: Could not create log file in {}. File logging disabled. Error: {}",
                    dir.display(),
                    e
                ),
            }
        }

        let console: Box<dyn Layer<Registry> + Send + Sync> = match self.config.format {
            LogFormat::Pretty => fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false)
                .boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        };

        let file_layer = run_log.map(|writer| {
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer)
        });

        if tracing_subscriber::registry()
            .with(console)
            .with(file_layer)
            .with(filter)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global subscriber already installed; keeping it");
        }

        handle
    }

    /// Log system information
    pub fn log_system_info(&self, handle: &LoggingHandle) {
        tracing::info!("--- segmerge {} ---", env!("CARGO_PKG_VERSION"));
        tracing::info!("Platform: {}", std::env::consts::OS);
        tracing::info!("Logging level: {}", self.config.level.as_str());
        match &handle.run_log_path {
            Some(path) => tracing::info!("Logging detailed output to: {}", path.display()),
            None => tracing::info!("File logging is disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_run_log_file_name_shape() {
        let name = LoggingSystem::run_log_file_name();
        assert!(name.starts_with("segmerge_"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "segmerge_20240101_120000.log".len());
    }

    #[test]
    fn test_run_log_is_flushed_when_guard_drops() {
        use std::io::Write;

        let dir = TempDir::new().unwrap();
        let (mut writer, guard, path) =
            LoggingSystem::open_run_log(&dir.path().join("logs")).unwrap();
        assert_eq!(path.parent(), Some(dir.path().join("logs").as_path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("segmerge_"));

        writer.write_all(b"hello\n").unwrap();
        drop(guard);
        assert_eq!(fs::read_to_string(path).unwrap(), "hello\n");
    }
}
