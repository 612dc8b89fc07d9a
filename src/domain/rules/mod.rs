// Domain rules - Business logic and policies

use thiserror::Error;

use crate::domain::errors::ProbeError;
use crate::domain::model::*;

/// Why a folder's segments cannot be merged
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    #[error("failed to read metadata of {}: {error}", .segment.path.display())]
    ProbeFailed { segment: Segment, error: ProbeError },

    #[error(
        "resolution mismatch: {} is {found}, reference {} is {reference}",
        .segment.file_name(),
        .reference_segment.file_name()
    )]
    ResolutionMismatch {
        reference_segment: Segment,
        reference: Resolution,
        segment: Segment,
        found: Resolution,
    },

    #[error("no usable parts ({skipped} with zero or negative duration)")]
    NoUsableParts { skipped: usize },
}

impl ValidationFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationFailure::ProbeFailed { .. } | ValidationFailure::NoUsableParts { .. } => {
                FailureKind::Metadata
            }
            ValidationFailure::ResolutionMismatch { .. } => FailureKind::ResolutionMismatch,
        }
    }

    /// Artifact body; enough to locate the offending file
    pub fn artifact_details(&self, folder: &SourceFolder) -> String {
        match self {
            ValidationFailure::ProbeFailed { segment, error } => format!(
                "Failed to get metadata for video part: {}\nCause: {}\n",
                segment.path.display(),
                error
            ),
            ValidationFailure::ResolutionMismatch {
                reference_segment,
                reference,
                segment,
                found,
            } => format!(
                "Resolution mismatch detected in folder: {}\n\
                 Reference video ({}): {}\n\
                 Mismatch video ({}): {}\n\
                 Mismatch file path: {}\n",
                folder.path.display(),
                reference_segment.file_name(),
                reference,
                segment.file_name(),
                found,
                segment.path.display()
            ),
            ValidationFailure::NoUsableParts { skipped } => format!(
                "No usable video parts in folder: {}\n\
                 {} part(s) reported zero or negative duration\n",
                folder.path.display(),
                skipped
            ),
        }
    }
}

/// What happened to an admitted segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First included segment; its resolution is now the reference
    Reference,
    Included,
    /// Duration was zero or negative
    Skipped,
}

/// Incremental resolution-consistency check over a folder's segments
///
/// Segments are admitted in playback order. The caller stops at the first
/// error, so segments after a failure are never probed.
#[derive(Debug, Default)]
pub struct ConsistencyCheck {
    included: Vec<Segment>,
    skipped: Vec<Segment>,
    reference: Option<Resolution>,
    total_duration: f64,
}

impl ConsistencyCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(
        &mut self,
        segment: Segment,
        metadata: SegmentMetadata,
    ) -> Result<Admission, ValidationFailure> {
        // NaN fails every comparison, so test for a usable length positively.
        if !(metadata.duration.is_finite() && metadata.duration > 0.0) {
            self.skipped.push(segment);
            return Ok(Admission::Skipped);
        }

        let found = metadata.resolution();
        let admission = match self.reference {
            None => {
                self.reference = Some(found);
                Admission::Reference
            }
            Some(reference) if reference == found => Admission::Included,
            Some(reference) => {
                let reference_segment = self.included[0].clone();
                return Err(ValidationFailure::ResolutionMismatch {
                    reference_segment,
                    reference,
                    segment,
                    found,
                });
            }
        };

        self.total_duration += metadata.duration;
        self.included.push(segment);
        Ok(admission)
    }

    /// Close the check; fails when every segment was skipped
    pub fn finish(self) -> Result<ValidatedMergeSet, ValidationFailure> {
        match self.reference {
            Some(resolution) if !self.included.is_empty() => Ok(ValidatedMergeSet {
                segments: self.included,
                skipped: self.skipped,
                resolution,
                total_duration: self.total_duration,
            }),
            _ => Err(ValidationFailure::NoUsableParts {
                skipped: self.skipped.len(),
            }),
        }
    }
}

/// Allowed drift between summed input durations and the merged duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationTolerance {
    /// Seconds
    pub absolute: f64,
    /// Fraction of the expected duration
    pub relative: f64,
}

impl Default for DurationTolerance {
    fn default() -> Self {
        Self {
            absolute: 5.0,
            relative: 0.02,
        }
    }
}

impl DurationTolerance {
    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    /// `max(absolute, expected * relative)`
    pub fn allowed_for(&self, expected: f64) -> f64 {
        self.absolute.max(expected * self.relative)
    }

    pub fn verify(&self, expected: f64, merged: f64) -> DurationVerification {
        let difference = (merged - expected).abs();
        let tolerance = self.allowed_for(expected);
        if difference > tolerance {
            DurationVerification::Exceeded {
                merged,
                difference,
                tolerance,
            }
        } else {
            DurationVerification::Within {
                merged,
                difference,
                tolerance,
            }
        }
    }
}
