// Batch interactor - Runs the merge pipeline over every folder of a root

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::app::merge_interactor::{MergeInteractor, ToolPaths};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::output::summary_lines;
use crate::ports::*;

const SEPARATOR: &str = "========================================";

/// Everything a batch run produced
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub summary: BatchSummary,
    pub folders: Vec<FolderResult>,
    /// Set when a tool disappeared mid-run and the batch stopped early
    pub halted_by: Option<ToolMissing>,
}

/// Planned work for one folder, as reported by `scan`
#[derive(Debug, Clone, Serialize)]
pub struct FolderPlan {
    pub folder: SourceFolder,
    pub segments: Vec<Segment>,
    /// `None` when the folder has no recognized video files
    pub output: Option<PathBuf>,
    pub output_exists: bool,
    pub check: Option<PlanCheck>,
}

/// Result of the optional consistency check during `scan --probe`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanCheck {
    Ready {
        resolution: Resolution,
        expected_duration: f64,
        skipped: usize,
    },
    Failed {
        kind: FailureKind,
        detail: String,
    },
}

/// Interactor for whole-root batch runs
pub struct BatchInteractor {
    scan_port: Arc<dyn ScanPort>,
    merge_interactor: Arc<MergeInteractor>,
    log_port: Arc<dyn LogPort>,
}

impl BatchInteractor {
    /// Create new batch interactor with injected ports
    pub fn new(
        scan_port: Arc<dyn ScanPort>,
        merge_interactor: Arc<MergeInteractor>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            scan_port,
            merge_interactor,
            log_port,
        }
    }

    /// Resolve the external tools before touching any folder
    pub fn preflight(&self) -> Result<ToolPaths, ToolMissing> {
        let tools = self.merge_interactor.locate_tools().map_err(|missing| {
            self.log_port.error(&format!(
                "{}. Please ensure it is installed and in your system's PATH.",
                missing
            ));
            missing
        })?;
        self.log_port
            .info(&format!("Using ffprobe: {}", tools.probe.display()));
        self.log_port
            .info(&format!("Using ffmpeg: {}", tools.merge.display()));
        Ok(tools)
    }

    /// Preflight, then process every folder
    pub async fn execute(&self, root: &Path) -> Result<BatchReport, ToolMissing> {
        self.preflight()?;
        Ok(self.run(root).await)
    }

    /// Process every eligible folder of `root` in order.
    ///
    /// Stops after the folder during which a tool went missing.
    pub async fn run(&self, root: &Path) -> BatchReport {
        let folders = self.scan_port.list_source_folders(root);
        self.log_port.info(&format!(
            "Found {} potential video folders in {}",
            folders.len(),
            root.display()
        ));

        let mut summary = BatchSummary::new(folders.len());
        let mut results = Vec::with_capacity(folders.len());
        let mut halted_by = None;

        for folder in folders {
            self.log_port.info(SEPARATOR);
            self.log_port
                .info(&format!("Processing folder: {}", folder.name));

            let segments = self.scan_port.list_segments(&folder);
            let result = if segments.is_empty() {
                self.log_port.warn(&format!(
                    "No video files found in {}, skipping.",
                    folder.path.display()
                ));
                FolderResult {
                    folder,
                    outcome: MergeOutcome::SkippedNoVideos,
                    artifact: None,
                }
            } else {
                let merged = self.merge_interactor.merge_folder(&folder, &segments).await;
                match merged {
                    Ok(result) => result,
                    Err(missing) => {
                        self.log_port.log_event(
                            &LogEvent::new(
                                LogLevel::Error,
                                format!(
                                    "Halting processing: {} while processing {}",
                                    missing, folder.name
                                ),
                            )
                            .with_field("folder", &folder.name)
                            .with_field("tool", &missing.tool),
                        );
                        let outcome = MergeOutcome::FailedUnexpected {
                            detail: missing.to_string(),
                        };
                        summary.record(&outcome, None);
                        summary.halted = true;
                        results.push(FolderResult {
                            folder,
                            outcome,
                            artifact: None,
                        });
                        halted_by = Some(missing);
                        break;
                    }
                }
            };

            summary.record(&result.outcome, result.artifact.as_deref());
            self.log_port
                .info(&format!("Finished processing folder: {}", result.folder.name));
            results.push(result);
        }

        self.log_summary(&summary);

        BatchReport {
            root: root.to_path_buf(),
            summary,
            folders: results,
            halted_by,
        }
    }

    /// Describe what `run` would do, optionally probing segments
    pub async fn plan(&self, root: &Path, probe: bool) -> Result<Vec<FolderPlan>, ToolMissing> {
        let mut plans = Vec::new();
        for folder in self.scan_port.list_source_folders(root) {
            let segments = self.scan_port.list_segments(&folder);
            if segments.is_empty() {
                plans.push(FolderPlan {
                    folder,
                    segments,
                    output: None,
                    output_exists: false,
                    check: None,
                });
                continue;
            }

            let output = self.merge_interactor.output_path_for(&folder, &segments);
            let output_exists = output.exists();
            let check = if probe && !output_exists {
                let validation = self.merge_interactor.validate(&folder, &segments).await?;
                Some(match validation {
                    Ok(set) => PlanCheck::Ready {
                        resolution: set.resolution,
                        expected_duration: set.total_duration,
                        skipped: set.skipped.len(),
                    },
                    Err(failure) => PlanCheck::Failed {
                        kind: failure.kind(),
                        detail: failure.to_string(),
                    },
                })
            } else {
                None
            };

            plans.push(FolderPlan {
                folder,
                segments,
                output: Some(output),
                output_exists,
                check,
            });
        }
        Ok(plans)
    }

    fn log_summary(&self, summary: &BatchSummary) {
        self.log_port.info(SEPARATOR);
        self.log_port.info("--- Batch Processing Summary ---");
        for line in summary_lines(summary) {
            self.log_port.info(&line);
        }

        if !summary.artifacts.is_empty() {
            self.log_port.warn(&format!(
                "Some folders failed. Check the log files in {} for details.",
                self.merge_interactor.artifacts().dir().display()
            ));
            for artifact in &summary.artifacts {
                self.log_port.info(&format!("  {}", artifact.display()));
            }
        }
    }
}
