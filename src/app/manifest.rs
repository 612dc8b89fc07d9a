//! Concat-demuxer list file for one merge

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::model::Segment;

/// Temporary `file '<path>'` list handed to the merge tool.
///
/// The file is removed when the guard is closed or dropped.
#[derive(Debug)]
pub struct ConcatManifest {
    file: NamedTempFile,
    entries: usize,
}

impl ConcatManifest {
    /// Write one entry per segment, in order, into a fresh file in `dir`
    /// (the system temp directory when `None`).
    pub fn create(folder_name: &str, segments: &[Segment], dir: Option<&Path>) -> io::Result<Self> {
        let prefix = format!("{}_concat_", folder_name);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".txt");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        for segment in segments {
            let path = absolute(&segment.path)?;
            writeln!(file, "{}", Self::entry_line(&path))?;
        }
        file.flush()?;

        Ok(Self {
            file,
            entries: segments.len(),
        })
    }

    /// `file '<path>'`, with single quotes escaped for the concat demuxer
    pub fn entry_line(path: &Path) -> String {
        let mut text = path.to_string_lossy().into_owned();
        if cfg!(windows) {
            text = text.replace('\\', "/");
        }
        format!("file '{}'", text.replace('\'', "'\\''"))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Delete the list file now, reporting failure instead of ignoring it
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
