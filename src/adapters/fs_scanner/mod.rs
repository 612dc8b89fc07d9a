// Filesystem scanner adapter - Folder and segment discovery

use std::path::Path;

use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::model::*;
use crate::ports::ScanPort;

/// Default recognized video container extensions
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv"];

/// Local filesystem scanner
pub struct FsScannerAdapter {
    video_extensions: Vec<String>,
}

impl FsScannerAdapter {
    /// Create a scanner recognizing the given extensions (case-insensitive, no dot)
    pub fn new<I, S>(video_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            video_extensions: video_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('_') || name.starts_with('.'))
            .unwrap_or(false)
    }

    fn is_video(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.video_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Immediate children of `dir`, sorted by file name
    fn children(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
    }
}

impl Default for FsScannerAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_EXTENSIONS)
    }
}

impl ScanPort for FsScannerAdapter {
    fn list_source_folders(&self, root: &Path) -> Vec<SourceFolder> {
        if !root.is_dir() {
            error!(root = %root.display(), "Main path is not a valid directory");
            return Vec::new();
        }

        let mut folders = Vec::new();
        for entry in Self::children(root) {
            match entry {
                Ok(entry) if entry.file_type().is_dir() && !Self::is_hidden(&entry) => {
                    folders.push(SourceFolder::from_path(entry.into_path()));
                }
                Ok(_) => {}
                Err(e) if e.depth() == 0 => {
                    error!(root = %root.display(), error = %e, "Error reading directory");
                    return Vec::new();
                }
                Err(e) => warn!(error = %e, "Skipping unreadable entry"),
            }
        }

        info!(
            "Found {} potential folders to process in {}",
            folders.len(),
            root.display()
        );
        folders
    }

    fn list_segments(&self, folder: &SourceFolder) -> Vec<Segment> {
        if !folder.path.is_dir() {
            warn!(folder = %folder.path.display(), "Path is not a directory, cannot get videos");
            return Vec::new();
        }

        let mut segments = Vec::new();
        for entry in Self::children(&folder.path) {
            match entry {
                Ok(entry)
                    if entry.file_type().is_file()
                        && !Self::is_hidden(&entry)
                        && self.is_video(entry.path()) =>
                {
                    segments.push(Segment::from_path(entry.into_path()));
                }
                Ok(_) => {}
                Err(e) if e.depth() == 0 => {
                    error!(folder = %folder.path.display(), error = %e, "Error reading directory");
                    return Vec::new();
                }
                Err(e) => warn!(error = %e, "Skipping unreadable entry"),
            }
        }

        // walkdir sorts by file name already; sorting by full path keeps the
        // playback order contract independent of that detail.
        segments.sort();
        info!("Found {} video parts in {}", segments.len(), folder.name);
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_lists_visible_directories_sorted() {
        let root = TempDir::new().unwrap();
        for name in ["b_show", "A", "_archive", ".cache", "c"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        touch(&root.path().join("loose.mp4"));

        let folders = FsScannerAdapter::default().list_source_folders(root.path());
        let names: Vec<_> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A", "b_show", "c"]);
    }

    #[test]
    fn test_missing_root_yields_no_folders() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope");
        assert!(FsScannerAdapter::default().list_source_folders(&missing).is_empty());
    }

    #[test]
    fn test_lists_recognized_videos_case_insensitive_sorted() {
        let root = TempDir::new().unwrap();
        let folder_path = root.path().join("A");
        fs::create_dir(&folder_path).unwrap();
        for name in ["part2.MP4", "part1.mkv", "notes.txt", ".part0.mp4", "part3.avi"] {
            touch(&folder_path.join(name));
        }
        fs::create_dir(folder_path.join("nested.mp4")).unwrap();

        let segments =
            FsScannerAdapter::default().list_segments(&SourceFolder::from_path(&folder_path));
        let names: Vec<_> = segments.iter().map(Segment::file_name).collect();
        assert_eq!(names, ["part1.mkv", "part2.MP4"]);
        assert_eq!(segments[1].extension, "MP4");
    }

    #[test]
    fn test_custom_extensions() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("a.ts"));
        touch(&root.path().join("b.mp4"));

        let scanner = FsScannerAdapter::new([".TS"]);
        let segments = scanner.list_segments(&SourceFolder::from_path(root.path()));
        let names: Vec<_> = segments.iter().map(Segment::file_name).collect();
        assert_eq!(names, ["a.ts"]);
    }
}
