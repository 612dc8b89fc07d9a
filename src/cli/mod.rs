//! CLI module for segmerge
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// segmerge - batch merge of multi-part recordings
///
/// Every subfolder of the source root is treated as one recording split into
/// parts; the parts are joined losslessly with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "segmerge")]
#[command(about = "Merge multi-part video recordings folder by folder, without re-encoding")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./segmerge.toml when present)
    #[arg(long, global = true, env = "SEGMERGE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SEGMERGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Console log format (pretty, compact, json)
    #[arg(long, global = true, env = "SEGMERGE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge the parts of every folder under a root
    Merge(args::MergeArgs),
    /// Show what `merge` would do without merging
    Scan(args::ScanArgs),
}
