//! segmerge library
//!
//! Merges the multi-part recordings stored one per folder into single files,
//! losslessly, after checking that all parts share a resolution.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{DomainError, ToolMissing};
pub use domain::model::{BatchSummary, FolderResult, MergeOutcome};
pub use error::{SegmergeError, SegmergeResult};
