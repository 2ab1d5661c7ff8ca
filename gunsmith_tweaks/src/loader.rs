//! Loader utilities for the mod's JSON inputs.
//!
//! The config decides which phases run; the override files are only read by
//! the phase that needs them.

pub mod config;
pub mod overrides;

use std::path::{Path, PathBuf};

use anyhow::Result;
use gunsmith_data::{DescriptionOverrides, ModConfig, RewardOverrides};

use crate::data_paths::{CONFIG_FILE, mod_root};

pub use config::load_config;
pub use overrides::{load_description_overrides, load_reward_overrides};

/// Override files shipped in the mod's `db/` directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideFile {
    Default,
    LoreAccurate,
    Descriptions,
}

impl OverrideFile {
    /// Path relative to the mod root.
    pub fn relative_path(self) -> &'static str {
        match self {
            OverrideFile::Default => "db/Default.json",
            OverrideFile::LoreAccurate => "db/LoreAccurate.json",
            OverrideFile::Descriptions => "db/Descriptions.json",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            OverrideFile::Default => "Default.json",
            OverrideFile::LoreAccurate => "LoreAccurate.json",
            OverrideFile::Descriptions => "Descriptions.json",
        }
    }
}

/// Source of the config and override data consumed by a run.
pub trait OverrideSource {
    /// # Errors
    /// - if the config cannot be read or parsed
    fn load_config(&self) -> Result<ModConfig>;

    /// # Errors
    /// - if the file cannot be read, parsed, or holds no mapping
    fn load_rewards(&self, file: OverrideFile) -> Result<RewardOverrides>;

    /// # Errors
    /// - if the file cannot be read, parsed, or holds no mapping
    fn load_descriptions(&self) -> Result<DescriptionOverrides>;
}

/// A mod directory on disk laid out as `config/config.json` plus `db/*.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDirectory {
    root: PathBuf,
}

impl ModDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use the mod root resolved by [`crate::data_paths`].
    pub fn detect() -> Self {
        Self::new(mod_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, file: OverrideFile) -> PathBuf {
        self.root.join(file.relative_path())
    }
}

impl OverrideSource for ModDirectory {
    fn load_config(&self) -> Result<ModConfig> {
        load_config(&self.root.join(CONFIG_FILE))
    }

    fn load_rewards(&self, file: OverrideFile) -> Result<RewardOverrides> {
        load_reward_overrides(&self.path_of(file))
    }

    fn load_descriptions(&self) -> Result<DescriptionOverrides> {
        load_description_overrides(&self.path_of(OverrideFile::Descriptions))
    }
}
