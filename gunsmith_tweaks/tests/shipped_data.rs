//! Checks against the data files shipped in `gunsmith_tweaks/data`.

use std::path::Path;

use anyhow::Result;
use gunsmith_data::{STARTED_BUCKET, lint_description_overrides, lint_reward_overrides};
use gunsmith_tweaks::loader::{load_config, load_description_overrides, load_reward_overrides};
use gunsmith_tweaks::{EditableSet, GunsmithTweaks, HostDatabase, ModDirectory, OverrideFile};

fn data_root() -> &'static Path {
    Path::new("data")
}

#[test]
fn shipped_override_files_are_clean() -> Result<()> {
    let editable = EditableSet::gunsmith();
    let mods = ModDirectory::new(data_root());

    for file in [OverrideFile::Default, OverrideFile::LoreAccurate] {
        let overrides = load_reward_overrides(&mods.path_of(file))?;
        assert!(!overrides.is_empty(), "{} should not be empty", file.file_name());
        let errors = lint_reward_overrides(file.file_name(), &overrides, |id| editable.contains(id));
        assert!(errors.is_empty(), "{errors:?}");
    }

    let descriptions = load_description_overrides(&mods.path_of(OverrideFile::Descriptions))?;
    let errors = lint_description_overrides("Descriptions.json", &descriptions, |id| editable.contains(id));
    assert!(errors.is_empty(), "{errors:?}");
    Ok(())
}

#[test]
fn shipped_config_enables_default_rewards() -> Result<()> {
    let config = load_config(&data_root().join("config/config.json"))?;
    assert!(config.default_rewards);
    Ok(())
}

#[test]
fn shipped_database_dry_run() -> Result<()> {
    let mut host = HostDatabase::load(&data_root().join("database"))?;
    let before: usize = host.quests.values().map(|q| q.bucket(STARTED_BUCKET).len()).sum();

    let report = GunsmithTweaks::new(ModDirectory::new(data_root())).run(&mut host.quests, &host.items)?;

    let after: usize = host.quests.values().map(|q| q.bucket(STARTED_BUCKET).len()).sum();
    assert!(report.default_rewards_added > 0);
    assert_eq!(after - before, report.default_rewards_added + report.lore_rewards_added);
    Ok(())
}
