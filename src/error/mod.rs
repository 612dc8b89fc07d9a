//! Error handling module for segmerge

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::{DomainError, ToolMissing};

/// Fatal errors that end a segmerge invocation
#[derive(Error, Debug)]
pub enum SegmergeError {
    /// ffprobe or ffmpeg unavailable
    #[error(transparent)]
    ToolMissing(#[from] ToolMissing),

    /// Source root missing or not a directory
    #[error("Source root is not a directory: {}", path.display())]
    InvalidRoot { path: PathBuf },

    /// Output directory could not be created
    #[error("Could not create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file or values rejected
    #[error("Configuration error: {0}")]
    Config(#[from] DomainError),
}

/// Result type alias for segmerge operations
pub type SegmergeResult<T> = std::result::Result<T, SegmergeError>;
