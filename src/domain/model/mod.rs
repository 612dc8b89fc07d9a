// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

/// A directory holding the segments of one logical recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFolder {
    pub path: PathBuf,
    pub name: String,
}

impl SourceFolder {
    /// Create a source folder; the display name is the final path component
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// One input video file of a source folder
///
/// Segments order by path, and that order is the playback order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Segment {
    pub path: PathBuf,
    /// Extension as found on disk, without the leading dot
    pub extension: String,
}

impl Segment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, extension }
    }

    /// File name for log lines
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Extension with its leading dot, empty when the file has none
    pub fn dotted_extension(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }
}

/// Picture dimensions of a video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Probed properties of a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentMetadata {
    /// Duration in seconds
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

impl SegmentMetadata {
    pub fn new(duration: f64, width: u32, height: u32) -> Self {
        Self {
            duration,
            width,
            height,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

/// Segments of one folder that passed the consistency checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedMergeSet {
    /// Included segments in playback order, never empty
    pub segments: Vec<Segment>,
    /// Segments left out because their duration was not positive
    pub skipped: Vec<Segment>,
    pub resolution: Resolution,
    /// Sum of the included segments' durations
    pub total_duration: f64,
}

/// Classification of a folder that did not produce a merged file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NoVideos,
    Metadata,
    ResolutionMismatch,
    MergeExecution,
    Unexpected,
}

impl FailureKind {
    /// Stable name used in artifact file names and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoVideos => "no_videos",
            FailureKind::Metadata => "metadata_error",
            FailureKind::ResolutionMismatch => "resolution_mismatch",
            FailureKind::MergeExecution => "ffmpeg_error",
            FailureKind::Unexpected => "unexpected_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing the merged duration with the expected one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DurationVerification {
    Within {
        merged: f64,
        difference: f64,
        tolerance: f64,
    },
    Exceeded {
        merged: f64,
        difference: f64,
        tolerance: f64,
    },
    /// The merged file could not be probed
    Unavailable { reason: String },
}

impl DurationVerification {
    pub fn is_within(&self) -> bool {
        matches!(self, DurationVerification::Within { .. })
    }
}

/// Details of a successful merge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    pub segments_merged: usize,
    pub segments_skipped: usize,
    pub resolution: Resolution,
    pub expected_duration: f64,
    pub verification: DurationVerification,
}

/// Per-folder result of the merge pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    AlreadyExists { output: PathBuf },
    Success(MergeReport),
    SkippedNoVideos,
    FailedMetadata { detail: String },
    FailedResolutionMismatch { detail: String },
    FailedMergeExecution { detail: String },
    FailedUnexpected { detail: String },
}

impl MergeOutcome {
    /// Build the failed outcome matching `kind`
    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match kind {
            FailureKind::NoVideos => MergeOutcome::SkippedNoVideos,
            FailureKind::Metadata => MergeOutcome::FailedMetadata { detail },
            FailureKind::ResolutionMismatch => MergeOutcome::FailedResolutionMismatch { detail },
            FailureKind::MergeExecution => MergeOutcome::FailedMergeExecution { detail },
            FailureKind::Unexpected => MergeOutcome::FailedUnexpected { detail },
        }
    }

    /// Success or an output that was already in place
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            MergeOutcome::AlreadyExists { .. } | MergeOutcome::Success(_)
        )
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            MergeOutcome::AlreadyExists { .. } | MergeOutcome::Success(_) => None,
            MergeOutcome::SkippedNoVideos => Some(FailureKind::NoVideos),
            MergeOutcome::FailedMetadata { .. } => Some(FailureKind::Metadata),
            MergeOutcome::FailedResolutionMismatch { .. } => Some(FailureKind::ResolutionMismatch),
            MergeOutcome::FailedMergeExecution { .. } => Some(FailureKind::MergeExecution),
            MergeOutcome::FailedUnexpected { .. } => Some(FailureKind::Unexpected),
        }
    }
}

/// Diagnostic record written for a failed folder
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorArtifact {
    pub folder_name: String,
    pub kind: FailureKind,
    pub details: String,
    pub recorded_at: DateTime<Local>,
}

impl ErrorArtifact {
    pub fn new(
        folder_name: impl Into<String>,
        kind: FailureKind,
        details: impl Into<String>,
    ) -> Self {
        Self {
            folder_name: folder_name.into(),
            kind,
            details: details.into(),
            recorded_at: Local::now(),
        }
    }

    /// `<folder>_<kind>.log`
    pub fn file_name(&self) -> String {
        format!("{}_{}.log", self.folder_name, self.kind.as_str())
    }

    /// Text body of the artifact file
    pub fn render(&self) -> String {
        let mut body = format!(
            "Folder: {}\nFailure: {}\nRecorded: {}\n\n",
            self.folder_name,
            self.kind,
            self.recorded_at.format("%Y-%m-%d %H:%M:%S")
        );
        body.push_str(self.details.trim_end());
        body.push('\n');
        body
    }
}

/// Outcome of one folder together with its diagnostic artifact, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderResult {
    pub folder: SourceFolder,
    pub outcome: MergeOutcome,
    pub artifact: Option<PathBuf>,
}

/// End-of-run counters, owned by the batch runner
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub discovered: usize,
    pub attempted: usize,
    /// Merged plus already existing
    pub succeeded: usize,
    pub already_existing: usize,
    pub failed: usize,
    pub failures_by_kind: BTreeMap<FailureKind, usize>,
    pub halted: bool,
    pub artifacts: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn new(discovered: usize) -> Self {
        Self {
            discovered,
            ..Self::default()
        }
    }

    /// Count one processed folder
    pub fn record(&mut self, outcome: &MergeOutcome, artifact: Option<&Path>) {
        self.attempted += 1;
        match outcome.failure_kind() {
            None => {
                self.succeeded += 1;
                if matches!(outcome, MergeOutcome::AlreadyExists { .. }) {
                    self.already_existing += 1;
                }
            }
            Some(kind) => {
                self.failed += 1;
                *self.failures_by_kind.entry(kind).or_insert(0) += 1;
            }
        }
        if let Some(path) = artifact {
            self.artifacts.push(path.to_path_buf());
        }
    }

    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests;
