// Merge interactor - Orchestrates the per-folder merge pipeline

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::app::manifest::ConcatManifest;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::output::ArtifactWriter;
use crate::ports::*;

/// Settings shared by every folder of a run
#[derive(Debug, Clone)]
pub struct MergeSettings {
    pub output_dir: PathBuf,
    pub tolerance: DurationTolerance,
    /// Where concat lists are written; system temp directory when `None`
    pub manifest_dir: Option<PathBuf>,
}

/// Resolved tool locations from the preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub probe: PathBuf,
    pub merge: PathBuf,
}

/// Ways a folder pipeline can stop early
enum FolderError {
    /// A required tool went away; ends the batch
    Fatal(ToolMissing),
    Unexpected(anyhow::Error),
}

impl From<ToolMissing> for FolderError {
    fn from(missing: ToolMissing) -> Self {
        FolderError::Fatal(missing)
    }
}

impl From<anyhow::Error> for FolderError {
    fn from(error: anyhow::Error) -> Self {
        FolderError::Unexpected(error)
    }
}

/// Interactor for merging the segments of one folder
pub struct MergeInteractor {
    probe_port: Arc<dyn ProbePort>,
    merge_port: Arc<dyn MergePort>,
    log_port: Arc<dyn LogPort>,
    artifacts: ArtifactWriter,
    settings: MergeSettings,
}

impl MergeInteractor {
    /// Create new merge interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        merge_port: Arc<dyn MergePort>,
        log_port: Arc<dyn LogPort>,
        artifacts: ArtifactWriter,
        settings: MergeSettings,
    ) -> Self {
        Self {
            probe_port,
            merge_port,
            log_port,
            artifacts,
            settings,
        }
    }

    pub fn artifacts(&self) -> &ArtifactWriter {
        &self.artifacts
    }

    /// Resolve both external tools
    pub fn locate_tools(&self) -> Result<ToolPaths, ToolMissing> {
        Ok(ToolPaths {
            probe: self.probe_port.locate()?,
            merge: self.merge_port.locate()?,
        })
    }

    /// `<output_dir>/<folder name><extension of the first segment>`
    pub fn output_path_for(&self, folder: &SourceFolder, segments: &[Segment]) -> PathBuf {
        let extension = segments
            .first()
            .map(Segment::dotted_extension)
            .unwrap_or_default();
        self.settings
            .output_dir
            .join(format!("{}{}", folder.name, extension))
    }

    /// Run the pipeline for one folder.
    ///
    /// Every folder-scoped problem becomes a [`MergeOutcome`]; only a missing
    /// tool is returned as an error.
    pub async fn merge_folder(
        &self,
        folder: &SourceFolder,
        segments: &[Segment],
    ) -> Result<FolderResult, ToolMissing> {
        if segments.is_empty() {
            return Ok(Self::result(folder, MergeOutcome::SkippedNoVideos, None));
        }

        let output = self.output_path_for(folder, segments);
        match self.run_pipeline(folder, segments, &output).await {
            Ok(result) => Ok(result),
            Err(FolderError::Fatal(missing)) => Err(missing),
            Err(FolderError::Unexpected(error)) => {
                let detail = format!("{:#}", error);
                self.log_port.log_event(
                    &LogEvent::new(
                        LogLevel::Error,
                        format!(
                            "An unexpected error occurred while processing folder {}: {}",
                            folder.name, detail
                        ),
                    )
                    .with_field("folder", &folder.name),
                );
                self.remove_partial_output(&output);
                let details = format!(
                    "Unexpected error while processing folder: {}\nOutput: {}\nError: {}\n",
                    folder.path.display(),
                    output.display(),
                    detail
                );
                let artifact = self.record_failure(folder, FailureKind::Unexpected, &details);
                Ok(Self::result(
                    folder,
                    MergeOutcome::FailedUnexpected { detail },
                    artifact,
                ))
            }
        }
    }

    async fn run_pipeline(
        &self,
        folder: &SourceFolder,
        segments: &[Segment],
        output: &Path,
    ) -> Result<FolderResult, FolderError> {
        if output.exists() {
            self.log_port.info(&format!(
                "Output file {} already exists. Skipping merge for this folder.",
                output.display()
            ));
            let outcome = MergeOutcome::AlreadyExists {
                output: output.to_path_buf(),
            };
            return Ok(Self::result(folder, outcome, None));
        }

        let set = match self.validate(folder, segments).await? {
            Ok(set) => set,
            Err(failure) => {
                self.log_port.log_event(
                    &LogEvent::new(
                        LogLevel::Error,
                        format!("Validation failed for folder {}: {}", folder.name, failure),
                    )
                    .with_field("folder", &folder.name)
                    .with_field("kind", failure.kind()),
                );
                let artifact = self.record_failure(
                    folder,
                    failure.kind(),
                    &failure.artifact_details(folder),
                );
                let outcome = MergeOutcome::failed(failure.kind(), failure.to_string());
                return Ok(Self::result(folder, outcome, artifact));
            }
        };

        if let Some((outcome, artifact)) = self.merge_segments(folder, &set, output).await? {
            return Ok(Self::result(folder, outcome, artifact));
        }

        let verification = self.verify_duration(folder, &set, output).await;
        let report = MergeReport {
            output: output.to_path_buf(),
            segments_merged: set.segments.len(),
            segments_skipped: set.skipped.len(),
            resolution: set.resolution,
            expected_duration: set.total_duration,
            verification,
        };
        Ok(Self::result(folder, MergeOutcome::Success(report), None))
    }

    /// Probe segments in order and check they can be concatenated.
    ///
    /// Stops probing at the first failure.
    pub async fn validate(
        &self,
        folder: &SourceFolder,
        segments: &[Segment],
    ) -> Result<Result<ValidatedMergeSet, ValidationFailure>, ToolMissing> {
        self.log_port.info(&format!(
            "Checking resolution consistency for {} video parts in {}...",
            segments.len(),
            folder.name
        ));

        let mut check = ConsistencyCheck::new();
        for (index, segment) in segments.iter().enumerate() {
            self.log_port.debug(&format!(
                "Getting metadata for part {}: {}",
                index + 1,
                segment.file_name()
            ));

            let metadata = match self.probe_port.probe(&segment.path).await {
                Ok(metadata) => metadata,
                Err(ProbeError::ToolMissing(missing)) => return Err(missing),
                Err(error) => {
                    return Ok(Err(ValidationFailure::ProbeFailed {
                        segment: segment.clone(),
                        error,
                    }))
                }
            };

            match check.admit(segment.clone(), metadata) {
                Ok(Admission::Reference) => self.log_port.info(&format!(
                    "Reference resolution set from {}: {}",
                    segment.file_name(),
                    metadata.resolution()
                )),
                Ok(Admission::Included) => {}
                Ok(Admission::Skipped) => self.log_port.warn(&format!(
                    "Skipping video part with zero or negative duration: {}",
                    segment.file_name()
                )),
                Err(failure) => return Ok(Err(failure)),
            }
        }

        let result = check.finish();
        if let Ok(set) = &result {
            if !set.skipped.is_empty() {
                self.log_port.warn(&format!(
                    "Processed {} out of {} parts in {} due to metadata issues.",
                    set.segments.len(),
                    segments.len(),
                    folder.name
                ));
            }
            self.log_port.info(&format!(
                "Resolution check passed for {}. All parts: {}",
                folder.name, set.resolution
            ));
            self.log_port.debug(&format!(
                "Expected total duration: {:.2}s",
                set.total_duration
            ));
        }
        Ok(result)
    }

    /// Concatenate the validated set; `Some` carries a failed outcome
    async fn merge_segments(
        &self,
        folder: &SourceFolder,
        set: &ValidatedMergeSet,
        output: &Path,
    ) -> Result<Option<(MergeOutcome, Option<PathBuf>)>, FolderError> {
        let manifest = ConcatManifest::create(
            &folder.name,
            &set.segments,
            self.settings.manifest_dir.as_deref(),
        )
        .with_context(|| format!("failed to write concat list for folder {}", folder.name))?;
        self.log_port.debug(&format!(
            "Generated temporary file list with {} entries: {}",
            manifest.entries(),
            manifest.path().display()
        ));

        self.log_port.info(&format!(
            "Starting merge for {} into {}...",
            folder.name,
            output.display()
        ));
        let merged = self.merge_port.concat(manifest.path(), output).await;

        let manifest_path = manifest.path().to_path_buf();
        if let Err(e) = manifest.close() {
            self.log_port.warn(&format!(
                "Could not delete temporary file {}: {}",
                manifest_path.display(),
                e
            ));
        }

        let (detail, diagnostics) = match merged {
            Ok(()) if output.exists() => {
                self.log_port.info(&format!(
                    "Successfully merged video saved to: {}",
                    output.display()
                ));
                return Ok(None);
            }
            Ok(()) => (
                "merge tool reported success but the output file was not created".to_string(),
                String::new(),
            ),
            Err(MergeError::ToolMissing(missing)) => {
                self.remove_partial_output(output);
                return Err(FolderError::Fatal(missing));
            }
            Err(error) => (error.to_string(), error.diagnostics().to_string()),
        };

        self.log_port.log_event(
            &LogEvent::new(
                LogLevel::Error,
                format!("Merge failed for folder {}: {}", folder.name, detail),
            )
            .with_field("folder", &folder.name)
            .with_field("output", output.display()),
        );
        self.remove_partial_output(output);

        let mut details = format!(
            "Merge failed for folder: {}\nOutput: {}\nError: {}\n",
            folder.path.display(),
            output.display(),
            detail
        );
        if !diagnostics.is_empty() {
            details.push_str("\n--- merge tool output ---\n");
            details.push_str(&diagnostics);
        }
        let artifact = self.record_failure(folder, FailureKind::MergeExecution, &details);
        Ok(Some((MergeOutcome::FailedMergeExecution { detail }, artifact)))
    }

    /// Compare the merged duration with the sum of the parts; advisory only
    async fn verify_duration(
        &self,
        folder: &SourceFolder,
        set: &ValidatedMergeSet,
        output: &Path,
    ) -> DurationVerification {
        let merged = match self.probe_port.probe(output).await {
            Ok(metadata) => metadata,
            Err(error) => {
                self.log_port.warn(&format!(
                    "Could not get or parse metadata for the merged video {}: {}. \
                     Duration check skipped.",
                    output.display(),
                    error
                ));
                return DurationVerification::Unavailable {
                    reason: error.to_string(),
                };
            }
        };

        let verification = self
            .settings
            .tolerance
            .verify(set.total_duration, merged.duration);
        match &verification {
            DurationVerification::Within { merged, .. } => self.log_port.info(&format!(
                "Duration check PASSED for {}: expected {:.2}s, got {:.2}s",
                folder.name, set.total_duration, merged
            )),
            DurationVerification::Exceeded {
                merged,
                difference,
                tolerance,
            } => self.log_port.log_event(
                &LogEvent::new(
                    LogLevel::Warn,
                    format!(
                        "Duration mismatch for {}: expected {:.2}s, got {:.2}s \
                         (difference {:.2}s exceeds tolerance {:.2}s)",
                        folder.name, set.total_duration, merged, difference, tolerance
                    ),
                )
                .with_field("folder", &folder.name)
                .with_field("expected", format!("{:.3}", set.total_duration))
                .with_field("merged", format!("{:.3}", merged)),
            ),
            DurationVerification::Unavailable { .. } => {}
        }
        verification
    }

    /// Write the artifact; a write failure is logged and the run continues
    fn record_failure(
        &self,
        folder: &SourceFolder,
        kind: FailureKind,
        details: &str,
    ) -> Option<PathBuf> {
        let artifact = ErrorArtifact::new(&folder.name, kind, details);
        match self.artifacts.write(&artifact) {
            Ok(path) => {
                self.log_port
                    .error(&format!("Error details saved to: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.log_port.error(&format!(
                    "Could not write {} log for {} in {}: {}",
                    kind,
                    folder.name,
                    self.artifacts.dir().display(),
                    e
                ));
                None
            }
        }
    }

    fn remove_partial_output(&self, output: &Path) {
        if !output.exists() {
            return;
        }
        match fs::remove_file(output) {
            Ok(()) => self.log_port.info(&format!(
                "Deleted incomplete output file due to merge error: {}",
                output.display()
            )),
            Err(e) => self.log_port.error(&format!(
                "Could not delete incomplete output file {}: {}",
                output.display(),
                e
            )),
        }
    }

    fn result(
        folder: &SourceFolder,
        outcome: MergeOutcome,
        artifact: Option<PathBuf>,
    ) -> FolderResult {
        FolderResult {
            folder: folder.clone(),
            outcome,
            artifact,
        }
    }
}
