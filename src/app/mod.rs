// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod manifest;
pub mod merge_interactor;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, BatchReport, FolderPlan, PlanCheck};
pub use container::{AppContainer, DefaultAppContainer};
pub use merge_interactor::{MergeInteractor, MergeSettings, ToolPaths};
