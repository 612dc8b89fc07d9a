// Ports - Interface definitions (contracts)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media metadata probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Resolve the probe tool; used for the preflight check
    fn locate(&self) -> Result<PathBuf, ToolMissing>;

    /// Read duration and frame size of a media file
    async fn probe(&self, path: &Path) -> Result<SegmentMetadata, ProbeError>;
}

/// Port for lossless concatenation
#[async_trait]
pub trait MergePort: Send + Sync {
    /// Resolve the merge tool; used for the preflight check
    fn locate(&self) -> Result<PathBuf, ToolMissing>;

    /// Concatenate the files listed in `manifest`, in listed order, into `output`.
    ///
    /// Streams are copied, never re-encoded. An existing `output` is never overwritten.
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), MergeError>;
}

/// Port for discovering folders and segments
pub trait ScanPort: Send + Sync {
    /// Eligible subdirectories of `root`, sorted by name
    fn list_source_folders(&self, root: &Path) -> Vec<SourceFolder>;

    /// Recognized video files directly inside `folder`, sorted by path
    fn list_segments(&self, folder: &SourceFolder) -> Vec<Segment>;
}

/// Port for logging and observability
pub trait LogPort: Send + Sync {
    /// Log structured event
    fn log_event(&self, event: &LogEvent);

    fn info(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Info, message));
    }

    fn warn(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Warn, message));
    }

    fn error(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Error, message));
    }

    fn debug(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Debug, message));
    }
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: SystemTime,
    pub fields: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: SystemTime::now(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a structured field
    pub fn with_field(mut self, key: &str, value: impl ToString) -> Self {
        self.fields.insert(key.to_string(), value.to_string());
        self
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
