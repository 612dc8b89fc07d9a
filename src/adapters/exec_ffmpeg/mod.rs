//! FFmpeg execution adapter
//!
//! Concatenates segments with the concat demuxer and stream copy.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::adapters::process::{locate_tool, run_tool, ToolRunError};
use crate::domain::errors::*;
use crate::ports::MergePort;

/// FFmpeg-based concatenation adapter
pub struct FfmpegConcatAdapter {
    binary: String,
    timeout: Option<Duration>,
}

impl FfmpegConcatAdapter {
    /// Create new FFmpeg adapter for the given binary name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Limit each merge to `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments for a copy-only concat of `manifest` into `output`
    pub fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-hide_banner",
            "-nostdin",
            "-v",
            "error",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(manifest.as_os_str().to_os_string());
        // Default stream selection; -n never overwrites an existing output
        for arg in ["-c", "copy", "-n"] {
            args.push(OsString::from(arg));
        }
        args.push(output.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl MergePort for FfmpegConcatAdapter {
    fn locate(&self) -> Result<PathBuf, ToolMissing> {
        locate_tool(&self.binary)
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), MergeError> {
        let mut command = Command::new(&self.binary);
        command.args(Self::concat_args(manifest, output));

        info!(output = %output.display(), "Starting ffmpeg concat");
        let result = run_tool(&self.binary, command, self.timeout).await;
        let output_status = match result {
            Ok(output) => output,
            Err(ToolRunError::Missing(missing)) => return Err(MergeError::ToolMissing(missing)),
            Err(ToolRunError::TimedOut(limit)) => {
                return Err(MergeError::TimedOut {
                    seconds: limit.as_secs(),
                    diagnostics: format!(
                        "ffmpeg did not finish within {}s and was killed",
                        limit.as_secs()
                    ),
                })
            }
            Err(ToolRunError::Io(e)) => return Err(MergeError::Io(e.to_string())),
        };

        if output_status.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output_status.stderr).trim().to_string();
            Err(MergeError::ExecutionFailed {
                status: output_status.status.code(),
                diagnostics: if stderr.is_empty() {
                    "No stderr captured from ffmpeg.".to_string()
                } else {
                    stderr
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_args_copy_streams_without_overwrite() {
        let args = FfmpegConcatAdapter::concat_args(
            Path::new("/tmp/list.txt"),
            Path::new("/out/A.mkv"),
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        let joined = args.join(" ");
        assert!(joined.contains("-f concat -safe 0 -i /tmp/list.txt"));
        assert!(joined.contains("-c copy"));
        assert!(args.contains(&"-n".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/out/A.mkv"));
        assert!(!args.iter().any(|arg| arg == "-y"));
        assert!(!args.iter().any(|arg| arg == "-map"));
    }
}
