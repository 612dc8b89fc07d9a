//! Run outputs other than merged media: diagnostic artifacts and the summary

pub mod artifacts;
pub mod summary;

pub use artifacts::ArtifactWriter;
pub use summary::summary_lines;
