//! Collaborators supplied by the server host.
//!
//! The host owns the quest table and resolves item names. The plugin only ever
//! borrows the table for the length of one run. [`HostDatabase`] is a stand-in
//! host backed by JSON dumps, used by the dry-run binary and the tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gunsmith_data::{QuestTable, Reward};
use log::info;

/// Placeholder shown for a reward that grants no item.
pub const NO_ITEM: &str = "(no item)";

/// Resolves an item template id to its display name.
pub trait ItemNames {
    fn item_name(&self, template: &str) -> String;
}

impl<F> ItemNames for F
where
    F: Fn(&str) -> String,
{
    fn item_name(&self, template: &str) -> String {
        self(template)
    }
}

/// Display name for a reward, resolved from its first item template.
pub fn reward_display_name(items: &dyn ItemNames, reward: &Reward) -> String {
    match reward.first_template() {
        Some(tpl) => items.item_name(tpl),
        None => NO_ITEM.to_string(),
    }
}

/// Item template id to display name, as found in a locale dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemLocale {
    names: HashMap<String, String>,
}

impl ItemLocale {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ItemNames for ItemLocale {
    /// Unknown templates fall back to the raw template id.
    fn item_name(&self, template: &str) -> String {
        self.names
            .get(template)
            .cloned()
            .unwrap_or_else(|| template.to_string())
    }
}

/// A host database loaded from `quests.json` and `items.json` in one directory.
#[derive(Debug, Clone, Default)]
pub struct HostDatabase {
    pub quests: QuestTable,
    pub items: ItemLocale,
}

impl HostDatabase {
    /// Load the quest table and item locale from `dir`.
    ///
    /// # Errors
    /// - on file IO error or JSON parsing error
    pub fn load(dir: &Path) -> Result<Self> {
        let quests_path = dir.join("quests.json");
        let items_path = dir.join("items.json");

        let text = fs::read_to_string(&quests_path)
            .with_context(|| format!("reading quest table from '{}'", quests_path.display()))?;
        let quests: QuestTable = serde_json::from_str(&text)
            .with_context(|| format!("parsing quest table from '{}'", quests_path.display()))?;
        info!("{} quests loaded from '{}'", quests.len(), quests_path.display());

        let text = fs::read_to_string(&items_path)
            .with_context(|| format!("reading item names from '{}'", items_path.display()))?;
        let names: HashMap<String, String> = serde_json::from_str(&text)
            .with_context(|| format!("parsing item names from '{}'", items_path.display()))?;
        info!("{} item names loaded from '{}'", names.len(), items_path.display());

        Ok(Self {
            quests,
            items: ItemLocale::new(names),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn display_name_uses_first_item_template() {
        let reward: Reward = serde_json::from_str(
            r#"{"items":[{"_tpl":"5447a9cd4bdc2dbd208b4567"},{"_tpl":"55d4887d4bdc2d962f8b4570"}]}"#,
        )
        .unwrap();
        let names = |tpl: &str| format!("name-of-{tpl}");
        assert_eq!(
            reward_display_name(&names, &reward),
            "name-of-5447a9cd4bdc2dbd208b4567"
        );
    }

    #[test]
    fn display_name_placeholder_without_items() {
        let reward: Reward = serde_json::from_str(r#"{"type":"Experience","value":500}"#).unwrap();
        let names = |_: &str| -> String { panic!("should not resolve a name") };
        assert_eq!(reward_display_name(&names, &reward), NO_ITEM);
    }

    #[test]
    fn locale_falls_back_to_template_id() {
        let locale = ItemLocale::new(HashMap::from([(
            "5447a9cd4bdc2dbd208b4567".to_string(),
            "Colt M4A1 5.56x45 assault rifle".to_string(),
        )]));
        assert_eq!(
            locale.item_name("5447a9cd4bdc2dbd208b4567"),
            "Colt M4A1 5.56x45 assault rifle"
        );
        assert_eq!(locale.item_name("ffffffffffffffffffffffff"), "ffffffffffffffffffffffff");
    }

    #[test]
    fn host_database_loads_both_dumps() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("quests.json"),
            r#"{"5ac23c6186f7741247042bad": {"_id": "5ac23c6186f7741247042bad", "QuestName": "Gunsmith - Part 1", "description": "old"}}"#,
        )?;
        fs::write(dir.path().join("items.json"), r#"{"5447a9cd4bdc2dbd208b4567": "M4A1"}"#)?;

        let db = HostDatabase::load(dir.path())?;
        assert_eq!(db.quests.len(), 1);
        assert_eq!(db.items.len(), 1);
        Ok(())
    }

    #[test]
    fn host_database_missing_file_errors() -> Result<()> {
        let dir = tempdir()?;
        let err = HostDatabase::load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("reading quest table"));
        Ok(())
    }
}
