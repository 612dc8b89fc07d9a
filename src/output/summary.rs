//! End-of-run summary rendering

use crate::domain::model::{BatchSummary, FailureKind};

/// Human-readable summary lines, in log order
pub fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Total potential folders found (excluding '_', '.' prefixes): {}",
            summary.discovered
        ),
        format!("Folders attempted processing: {}", summary.attempted),
        format!(
            "Successfully merged (or skipped existing): {} ({} already existed)",
            summary.succeeded, summary.already_existing
        ),
        format!(
            "Failed/Skipped (errors, no videos, mismatch, etc.): {}",
            summary.failed
        ),
    ];

    for (kind, count) in &summary.failures_by_kind {
        lines.push(format!("  {}: {}", describe(*kind), count));
    }

    if summary.halted {
        lines.push("Batch halted early: a required tool became unavailable".to_string());
    }

    lines
}

fn describe(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::NoVideos => "no video files",
        FailureKind::Metadata => "metadata errors",
        FailureKind::ResolutionMismatch => "resolution mismatches",
        FailureKind::MergeExecution => "merge failures",
        FailureKind::Unexpected => "unexpected errors",
    }
}
