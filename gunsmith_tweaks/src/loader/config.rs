//! module `loader::config`

use std::{fs, path::Path};

use anyhow::{Context, Result};
use gunsmith_data::ModConfig;
use log::info;

/// Load the feature switches from `config/config.json`.
/// # Errors
/// - on file IO error or JSON parsing error
pub fn load_config(json_path: &Path) -> Result<ModConfig> {
    let text =
        fs::read_to_string(json_path).with_context(|| format!("reading mod config from '{}'", json_path.display()))?;
    let config: ModConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing mod config from '{}'", json_path.display()))?;
    info!(
        "config loaded from '{}' (DefaultRewards={}, LoreAccurate={}, DebugLogging={})",
        json_path.display(),
        config.default_rewards,
        config.lore_accurate,
        config.debug_logging
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_config_reads_flags() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"DefaultRewards": true, "LoreAccurate": true, "DebugLogging": false}"#)?;

        let config = load_config(&path)?;
        assert!(config.default_rewards);
        assert!(config.lore_accurate);
        assert!(!config.debug_logging);
        Ok(())
    }

    #[test]
    fn load_config_missing_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let err = load_config(&dir.path().join("config.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading mod config"));
        Ok(())
    }

    #[test]
    fn load_config_rejects_wrong_types() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"DefaultRewards": "yes"}"#)?;
        assert!(load_config(&path).is_err());
        Ok(())
    }
}
