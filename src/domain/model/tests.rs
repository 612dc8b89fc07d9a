// Unit tests for domain models

use super::*;

#[test]
fn test_source_folder_name_from_path() {
    let folder = SourceFolder::from_path("/recordings/Lecture 01");
    assert_eq!(folder.name, "Lecture 01");
    assert_eq!(folder.path, PathBuf::from("/recordings/Lecture 01"));
}

#[test]
fn test_segment_keeps_extension_case() {
    let segment = Segment::from_path("/rec/A/part1.MKV");
    assert_eq!(segment.extension, "MKV");
    assert_eq!(segment.dotted_extension(), ".MKV");
    assert_eq!(segment.file_name(), "part1.MKV");

    let bare = Segment::from_path("/rec/A/noext");
    assert_eq!(bare.dotted_extension(), "");
}

#[test]
fn test_segments_order_by_path() {
    let mut segments = vec![
        Segment::from_path("/rec/A/part10.mp4"),
        Segment::from_path("/rec/A/part02.mp4"),
        Segment::from_path("/rec/A/part01.mp4"),
    ];
    segments.sort();
    let names: Vec<_> = segments.iter().map(Segment::file_name).collect();
    assert_eq!(names, ["part01.mp4", "part02.mp4", "part10.mp4"]);
}

#[test]
fn test_resolution_display() {
    assert_eq!(Resolution::new(1920, 1080).to_string(), "1920x1080");
    assert_eq!(SegmentMetadata::new(3.0, 1280, 720).resolution(), Resolution::new(1280, 720));
}

#[test]
fn test_error_artifact_file_name_and_body() {
    let artifact = ErrorArtifact::new(
        "B",
        FailureKind::ResolutionMismatch,
        "Mismatch file path: /rec/B/2.mp4\n",
    );
    assert_eq!(artifact.file_name(), "B_resolution_mismatch.log");

    let body = artifact.render();
    assert!(body.starts_with("Folder: B\nFailure: resolution_mismatch\n"));
    assert!(body.ends_with("Mismatch file path: /rec/B/2.mp4\n"));
}

#[test]
fn test_outcome_failure_kinds() {
    assert_eq!(MergeOutcome::SkippedNoVideos.failure_kind(), Some(FailureKind::NoVideos));
    assert_eq!(
        MergeOutcome::failed(FailureKind::MergeExecution, "boom").failure_kind(),
        Some(FailureKind::MergeExecution)
    );

    let existing = MergeOutcome::AlreadyExists {
        output: PathBuf::from("/out/A.mp4"),
    };
    assert!(existing.is_success());
    assert_eq!(existing.failure_kind(), None);
}

#[test]
fn test_summary_counts() {
    let mut summary = BatchSummary::new(4);
    summary.record(
        &MergeOutcome::AlreadyExists {
            output: PathBuf::from("/out/A.mp4"),
        },
        None,
    );
    summary.record(&MergeOutcome::SkippedNoVideos, None);
    summary.record(
        &MergeOutcome::failed(FailureKind::ResolutionMismatch, "1280x720 vs 1920x1080"),
        Some(Path::new("/logs/C_resolution_mismatch.log")),
    );

    assert_eq!(summary.discovered, 4);
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.already_existing, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.failures_of(FailureKind::NoVideos), 1);
    assert_eq!(summary.failures_of(FailureKind::ResolutionMismatch), 1);
    assert_eq!(summary.failures_of(FailureKind::Metadata), 0);
    assert_eq!(summary.artifacts.len(), 1);
}

#[test]
fn test_failure_kind_serializes_snake_case() {
    let json = serde_json::to_string(&FailureKind::ResolutionMismatch).unwrap();
    assert_eq!(json, "\"resolution_mismatch\"");
}
