#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const GUNSMITH_TWEAKS_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod data_paths;
pub mod editable;
pub mod host;
pub mod loader;
pub mod merge;
pub mod orchestrator;
pub mod report;

// Re-exports for convenience
pub use editable::EditableSet;
pub use host::{HostDatabase, ItemLocale, ItemNames};
pub use loader::{ModDirectory, OverrideFile, OverrideSource};
pub use merge::{MergeContext, RewardTally, SkipReason};
pub use orchestrator::{GunsmithTweaks, RunPhase, on_load};
pub use report::RunReport;
