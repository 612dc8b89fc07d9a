//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory whose subfolders hold the video parts
    pub root: PathBuf,

    /// Directory for merged files (created if missing)
    #[arg(env = "SEGMERGE_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Directory for per-folder error logs (default: the log directory)
    #[arg(long, env = "SEGMERGE_DIAGNOSTICS_DIR", value_name = "DIR")]
    pub diagnostics_dir: Option<PathBuf>,

    /// Directory for the run log (default: ./segmerge-logs)
    #[arg(long, env = "SEGMERGE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Kill ffprobe/ffmpeg invocations running longer than this
    #[arg(long, env = "SEGMERGE_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the batch report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory whose subfolders hold the video parts
    pub root: PathBuf,

    /// Directory merged files would be written to
    #[arg(env = "SEGMERGE_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Probe every part and run the resolution check
    #[arg(long)]
    pub probe: bool,

    /// Print the plan as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
