//! Command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, DefaultAppContainer, FolderPlan, PlanCheck};
use crate::cli::args::{MergeArgs, ScanArgs};
use crate::config_initialization::RunSettings;
use crate::error::SegmergeError;
use crate::ports::LogPort;
use crate::utils::Utils;

/// Execute the merge command
pub async fn merge(
    args: &MergeArgs,
    settings: &RunSettings,
    log_port: Arc<dyn LogPort>,
) -> Result<()> {
    validate_root(&args.root)?;
    prepare_output_dir(&settings.output_dir)?;

    info!("Source root: {}", args.root.display());
    info!("Output directory: {}", settings.output_dir.display());
    info!("Diagnostics directory: {}", settings.diagnostics_dir.display());

    let container = DefaultAppContainer::new(settings, log_port);
    let report = container
        .batch_interactor()
        .execute(&args.root)
        .await
        .map_err(SegmergeError::from)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize batch report")?;
        println!("{}", json);
    }

    if let Some(missing) = report.halted_by {
        return Err(SegmergeError::from(missing).into());
    }
    Ok(())
}

/// Execute the scan command
pub async fn scan(
    args: &ScanArgs,
    settings: &RunSettings,
    log_port: Arc<dyn LogPort>,
) -> Result<()> {
    validate_root(&args.root)?;

    let container = DefaultAppContainer::new(settings, log_port);
    let batch = container.batch_interactor();
    if args.probe {
        batch.preflight().map_err(SegmergeError::from)?;
    }

    let plans = batch
        .plan(&args.root, args.probe)
        .await
        .map_err(SegmergeError::from)?;

    if args.json {
        let json = serde_json::to_string_pretty(&plans).context("Failed to serialize scan plan")?;
        println!("{}", json);
    } else {
        for line in plan_lines(&plans) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn validate_root(root: &Path) -> Result<(), SegmergeError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(SegmergeError::InvalidRoot {
            path: root.to_path_buf(),
        })
    }
}

fn prepare_output_dir(dir: &Path) -> Result<(), SegmergeError> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| SegmergeError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;
    info!("Created output directory: {}", dir.display());
    Ok(())
}

/// Plain-text rendering of a scan
pub fn plan_lines(plans: &[FolderPlan]) -> Vec<String> {
    let mut lines = Vec::new();
    for plan in plans {
        let Some(output) = &plan.output else {
            lines.push(format!("{}: no video files", plan.folder.name));
            continue;
        };

        let state = if plan.output_exists { " (exists, will skip)" } else { "" };
        lines.push(format!(
            "{}: {} part(s) -> {}{}",
            plan.folder.name,
            plan.segments.len(),
            output.display(),
            state
        ));
        for segment in &plan.segments {
            lines.push(format!("    {}", segment.file_name()));
        }

        match &plan.check {
            Some(PlanCheck::Ready {
                resolution,
                expected_duration,
                skipped,
            }) => lines.push(format!(
                "  ready: {}, expected duration {}, {} part(s) skipped",
                resolution,
                Utils::format_seconds(*expected_duration),
                skipped
            )),
            Some(PlanCheck::Failed { kind, detail }) => {
                lines.push(format!("  would fail ({}): {}", kind, detail))
            }
            None => {}
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FailureKind, Resolution, Segment, SourceFolder};
    use std::path::PathBuf;

    #[test]
    fn test_plan_lines() {
        let plans = vec![
            FolderPlan {
                folder: SourceFolder::from_path("/videos/A"),
                segments: vec![
                    Segment::from_path("/videos/A/1.mp4"),
                    Segment::from_path("/videos/A/2.mp4"),
                ],
                output: Some(PathBuf::from("/out/A.mp4")),
                output_exists: false,
                check: Some(PlanCheck::Ready {
                    resolution: Resolution::new(1920, 1080),
                    expected_duration: 75.0,
                    skipped: 0,
                }),
            },
            FolderPlan {
                folder: SourceFolder::from_path("/videos/B"),
                segments: vec![Segment::from_path("/videos/B/1.mkv")],
                output: Some(PathBuf::from("/out/B.mkv")),
                output_exists: true,
                check: Some(PlanCheck::Failed {
                    kind: FailureKind::ResolutionMismatch,
                    detail: "mismatch".to_string(),
                }),
            },
            FolderPlan {
                folder: SourceFolder::from_path("/videos/C"),
                segments: Vec::new(),
                output: None,
                output_exists: false,
                check: None,
            },
        ];

        let lines = plan_lines(&plans);
        assert_eq!(lines[0], "A: 2 part(s) -> /out/A.mp4");
        assert_eq!(lines[1], "    1.mp4");
        assert_eq!(lines[3], "  ready: 1920x1080, expected duration 01:15.000, 0 part(s) skipped");
        assert_eq!(lines[4], "B: 1 part(s) -> /out/B.mkv (exists, will skip)");
        assert_eq!(lines[6], "  would fail (resolution_mismatch): mismatch");
        assert_eq!(lines[7], "C: no video files");
    }

    #[test]
    fn test_validate_root_rejects_files_and_missing_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(validate_root(dir.path()).is_ok());
        assert!(matches!(validate_root(&file), Err(SegmergeError::InvalidRoot { .. })));
        assert!(validate_root(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_prepare_output_dir_creates_nested_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("a").join("b");
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }
}
