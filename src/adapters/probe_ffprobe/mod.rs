//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and extracts container duration plus the
//! frame size of the first video stream.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::adapters::process::{locate_tool, run_tool, ToolRunError};
use crate::domain::errors::*;
use crate::domain::model::SegmentMetadata;
use crate::ports::ProbePort;

#[derive(Debug, Deserialize, Default)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    binary: String,
    timeout: Option<Duration>,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter for the given binary name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Limit each probe to `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path);
        command
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    fn locate(&self) -> Result<PathBuf, ToolMissing> {
        locate_tool(&self.binary)
    }

    async fn probe(&self, path: &Path) -> Result<SegmentMetadata, ProbeError> {
        let output = run_tool(&self.binary, self.command(path), self.timeout)
            .await
            .map_err(|e| match e {
                ToolRunError::Missing(missing) => ProbeError::ToolMissing(missing),
                ToolRunError::TimedOut(limit) => ProbeError::ExecutionFailed(format!(
                    "ffprobe timed out after {}s on {}",
                    limit.as_secs(),
                    path.display()
                )),
                ToolRunError::Io(e) => ProbeError::ExecutionFailed(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::ExecutionFailed(if stderr.trim().is_empty() {
                format!("ffprobe exited with {} for {}", output.status, path.display())
            } else {
                stderr.trim().to_string()
            }));
        }

        let metadata = parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!(
            path = %path.display(),
            duration = metadata.duration,
            width = metadata.width,
            height = metadata.height,
            "Probed media file"
        );
        Ok(metadata)
    }
}

/// Extract duration and frame size from `ffprobe -print_format json` output
pub fn parse_probe_output(json: &str) -> Result<SegmentMetadata, ProbeError> {
    let parsed: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| ProbeError::UnparseableOutput(e.to_string()))?;

    let video = parsed
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .ok_or(ProbeError::NoVideoStream)?;

    let duration = parsed.format.as_ref().and_then(|format| format.duration.as_deref());

    let mut missing = Vec::new();
    if duration.is_none() {
        missing.push("duration".to_string());
    }
    if video.width.is_none() {
        missing.push("width".to_string());
    }
    if video.height.is_none() {
        missing.push("height".to_string());
    }

    match (duration, video.width, video.height) {
        (Some(duration), Some(width), Some(height)) => {
            let seconds = duration.trim().parse::<f64>().map_err(|e| {
                ProbeError::UnparseableOutput(format!("invalid duration '{}': {}", duration, e))
            })?;
            if !seconds.is_finite() {
                return Err(ProbeError::UnparseableOutput(format!(
                    "non-finite duration '{}'",
                    duration
                )));
            }
            Ok(SegmentMetadata::new(seconds, width, height))
        }
        _ => Err(ProbeError::MissingFields(missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_output() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_type": "audio", "sample_rate": "48000"},
                {"index": 1, "codec_type": "video", "codec_name": "h264",
                 "width": 1920, "height": 1080}
            ],
            "format": {"filename": "a.mp4", "duration": "30.033000"}
        }"#;
        let metadata = parse_probe_output(json).unwrap();
        assert_eq!(metadata, SegmentMetadata::new(30.033, 1920, 1080));
    }

    #[test]
    fn test_parse_without_video_stream() {
        let json = r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "3.0"}}"#;
        assert_eq!(parse_probe_output(json), Err(ProbeError::NoVideoStream));
    }

    #[test]
    fn test_parse_reports_every_missing_field() {
        let json = r#"{"streams": [{"codec_type": "video", "width": 640}], "format": {}}"#;
        assert_eq!(
            parse_probe_output(json),
            Err(ProbeError::MissingFields(vec![
                "duration".to_string(),
                "height".to_string()
            ]))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_probe_output("not json"),
            Err(ProbeError::UnparseableOutput(_))
        ));
        assert!(matches!(
            parse_probe_output(&with_duration("N/A")),
            Err(ProbeError::UnparseableOutput(_))
        ));
    }

    fn with_duration(duration: &str) -> String {
        format!(
            r#"{{"streams": [{{"codec_type": "video", "width": 1, "height": 1}}],
                "format": {{"duration": "{}"}}}}"#,
            duration
        )
    }

    #[test]
    fn test_parse_rejects_non_finite_duration() {
        for duration in ["nan", "NaN", "inf", "-inf", "infinity"] {
            match parse_probe_output(&with_duration(duration)) {
                Err(ProbeError::UnparseableOutput(message)) => {
                    assert!(message.contains(duration), "{}", message)
                }
                other => panic!("{} parsed as {:?}", duration, other),
            }
        }
        assert_eq!(
            parse_probe_output(&with_duration("2.5")),
            Ok(SegmentMetadata::new(2.5, 1, 1))
        );
    }

    #[test]
    fn test_empty_object_has_no_video_stream() {
        assert_eq!(parse_probe_output("{}"), Err(ProbeError::NoVideoStream));
    }
}
