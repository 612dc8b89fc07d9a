//! Diagnostic artifact files for failed folders

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::model::ErrorArtifact;

/// Writes `<folder>_<kind>.log` files into the diagnostics directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the artifact, creating the directory on first use.
    ///
    /// A previous artifact of the same folder and kind is replaced.
    pub fn write(&self, artifact: &ErrorArtifact) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(artifact.file_name());
        fs::write(&path, artifact.render())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FailureKind;
    use tempfile::TempDir;

    #[test]
    fn test_writes_named_artifact_in_new_directory() {
        let root = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(root.path().join("diagnostics"));
        let artifact = ErrorArtifact::new("Show 3", FailureKind::MergeExecution, "ffmpeg said no");

        let path = writer.write(&artifact).unwrap();

        assert_eq!(path, root.path().join("diagnostics").join("Show 3_ffmpeg_error.log"));
        let body = fs::read_to_string(path).unwrap();
        assert!(body.contains("Failure: ffmpeg_error"));
        assert!(body.contains("ffmpeg said no"));
    }
}
