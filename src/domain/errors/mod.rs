// Domain errors - Error types for the domain layer

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Domain-specific error types
#[derive(Debug, Clone)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Filesystem operation failed
    FsFail(String),
    /// Configuration could not be loaded or is invalid
    InvalidConfig(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "Filesystem error: {}", msg),
            DomainError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// A required external tool could not be found or started.
///
/// This is the only fatal condition of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("required tool '{tool}' is not available: {reason}")]
pub struct ToolMissing {
    pub tool: String,
    pub reason: String,
}

impl ToolMissing {
    pub fn new(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

/// Failure while probing a media file
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    #[error(transparent)]
    ToolMissing(#[from] ToolMissing),

    /// The probe tool ran but reported an error, or timed out
    #[error("probe execution failed: {0}")]
    ExecutionFailed(String),

    #[error("unparseable probe output: {0}")]
    UnparseableOutput(String),

    #[error("no video stream found")]
    NoVideoStream,

    #[error("missing metadata fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// Failure while concatenating segments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    #[error(transparent)]
    ToolMissing(#[from] ToolMissing),

    /// The merge tool exited unsuccessfully; `diagnostics` holds its stderr
    #[error("merge tool exited with status {status:?}")]
    ExecutionFailed {
        status: Option<i32>,
        diagnostics: String,
    },

    #[error("merge tool timed out after {seconds}s")]
    TimedOut { seconds: u64, diagnostics: String },

    #[error("merge I/O error: {0}")]
    Io(String),
}

impl MergeError {
    /// Diagnostic text captured from the merge tool, if any
    pub fn diagnostics(&self) -> &str {
        match self {
            MergeError::ExecutionFailed { diagnostics, .. }
            | MergeError::TimedOut { diagnostics, .. } => diagnostics,
            _ => "",
        }
    }
}
