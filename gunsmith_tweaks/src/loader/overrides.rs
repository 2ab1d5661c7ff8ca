//! Override file loading.
//!
//! A file that cannot be turned into a mapping at all is an error for the whole
//! phase. Individual entries are not validated here; the merge engine skips bad
//! ones one at a time.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use gunsmith_data::{DescriptionOverrides, RewardOverrides};
use log::info;
use serde::de::DeserializeOwned;

/// Load a quest id → reward list mapping (`Default.json`, `LoreAccurate.json`).
/// # Errors
/// - on file IO error, JSON parsing error, or a `null` document
pub fn load_reward_overrides(json_path: &Path) -> Result<RewardOverrides> {
    let overrides: RewardOverrides = load_mapping(json_path, "reward overrides")?;
    info!("{} entries: {}", file_label(json_path), overrides.len());
    Ok(overrides)
}

/// Load a quest id → `{ "description": ... }` mapping (`Descriptions.json`).
/// # Errors
/// - on file IO error, JSON parsing error, or a `null` document
pub fn load_description_overrides(json_path: &Path) -> Result<DescriptionOverrides> {
    let overrides: DescriptionOverrides = load_mapping(json_path, "description overrides")?;
    info!("{} entries: {}", file_label(json_path), overrides.len());
    Ok(overrides)
}

fn load_mapping<T: DeserializeOwned>(json_path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(json_path)
        .with_context(|| format!("reading {what} from '{}'", json_path.display()))?;
    let parsed: Option<T> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {what} from '{}'", json_path.display()))?;
    match parsed {
        Some(mapping) => Ok(mapping),
        None => bail!("'{}' holds no {what} (document is null)", json_path.display()),
    }
}

fn file_label(json_path: &Path) -> String {
    json_path
        .file_name()
        .map_or_else(|| json_path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
