use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;

use crate::validate::{ValidationError, is_valid_quest_id};

/// Reward bucket granted when a quest enters its started state.
pub const STARTED_BUCKET: &str = "Started";

/// Quest table as exposed by the host, keyed by quest id.
pub type QuestTable = HashMap<QuestId, Quest>;

/// Ordered reward overrides as read from `Default.json` / `LoreAccurate.json`.
pub type RewardOverrides = OverrideMap<Vec<Reward>>;

/// Description overrides as read from `Descriptions.json`.
pub type DescriptionOverrides = OverrideMap<DescriptionEntry>;

/// A 24-character hexadecimal quest identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestId(String);

impl QuestId {
    /// Validate `raw` and wrap it as a quest id.
    ///
    /// # Errors
    /// Returns [`ValidationError::MalformedQuestId`] if `raw` is not 24 hex digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if is_valid_quest_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::MalformedQuestId { key: raw.to_string() })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QuestId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_quest_id(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::MalformedQuestId { key: value })
        }
    }
}

impl From<QuestId> for String {
    fn from(value: QuestId) -> Self {
        value.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quest record owned by the host.
///
/// Only the fields touched by the plugin are typed; everything else rides along
/// in `extra` so untouched quests serialize back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    #[serde(rename = "_id")]
    pub id: QuestId,
    #[serde(rename = "QuestName", default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Bucket name to rewards. Hosts may store a bucket as `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<BTreeMap<String, Option<Vec<Reward>>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quest {
    /// Create a bare quest with no reward buckets.
    pub fn new(id: QuestId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            rewards: None,
            extra: Map::new(),
        }
    }

    /// Rewards currently in the named bucket, or an empty slice.
    pub fn bucket(&self, name: &str) -> &[Reward] {
        self.rewards
            .as_ref()
            .and_then(|buckets| buckets.get(name))
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    /// Mutable access to the started bucket, creating the rewards map and the
    /// bucket if either is missing or `null`. The flag is `true` when the bucket
    /// was created.
    pub fn started_bucket_mut(&mut self) -> (&mut Vec<Reward>, bool) {
        let buckets = self.rewards.get_or_insert_with(BTreeMap::new);
        let slot = buckets.entry(STARTED_BUCKET.to_string()).or_default();
        let created = slot.is_none();
        (slot.get_or_insert_with(Vec::new), created)
    }
}

/// One grantable reward. Opaque apart from the item list used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RewardItem>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reward {
    /// Template id of the first granted item, if any.
    pub fn first_template(&self) -> Option<&str> {
        self.items
            .as_ref()
            .and_then(|items| items.first())
            .and_then(|item| item.template.as_deref())
            .filter(|tpl| !tpl.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardItem {
    #[serde(rename = "_tpl", default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Replacement description text for one quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    #[serde(default)]
    pub description: Option<String>,
}

impl DescriptionEntry {
    /// The description, treating a missing value as empty.
    pub fn text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Feature switches read from `config/config.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModConfig {
    #[serde(default, alias = "defaultRewards")]
    pub default_rewards: bool,
    #[serde(default, alias = "loreAccurate")]
    pub lore_accurate: bool,
    #[serde(default, alias = "debugLogging")]
    pub debug_logging: bool,
}

/// A JSON object keyed by quest id that remembers the order its keys were read in.
///
/// Keys stay raw strings here; validating them is the consumer's job so that a bad
/// key skips one entry instead of failing the whole file. A `null` value reads as
/// `T::default()` for the same reason. A key seen twice keeps its first position
/// and its last value.
#[derive(Debug, Clone)]
pub struct OverrideMap<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> OverrideMap<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace the value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<T> Default for OverrideMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for OverrideMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for OverrideMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for OverrideMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for OverrideMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OverrideMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de> + Default> Visitor<'de> for OverrideMapVisitor<T> {
            type Value = OverrideMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by quest id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OverrideMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Option<T>>()? {
                    map.insert(key, value.unwrap_or_default());
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OverrideMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUNSMITH_1: &str = "5ac23c6186f7741247042bad";

    #[test]
    fn quest_id_accepts_mixed_case_hex() {
        let id = QuestId::parse("5AC23C6186F7741247042bad").unwrap();
        assert_eq!(id.as_str(), "5AC23C6186F7741247042bad");
    }

    #[test]
    fn quest_id_rejects_short_and_non_hex() {
        assert!(QuestId::parse("notavalidid").is_err());
        assert!(QuestId::parse("5ac23c6186f7741247042bag").is_err());
        assert!(QuestId::parse("").is_err());
    }

    #[test]
    fn quest_id_deserialize_validates() {
        let ok: Result<QuestId, _> = serde_json::from_str(&format!("\"{GUNSMITH_1}\""));
        assert!(ok.is_ok());
        let bad: Result<QuestId, _> = serde_json::from_str("\"abc\"");
        assert!(bad.is_err());
    }

    #[test]
    fn override_map_keeps_file_order() {
        let map: OverrideMap<u32> = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn override_map_duplicate_key_last_value_wins() {
        let map: OverrideMap<u32> = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.keys().next(), Some("a"));
    }

    #[test]
    fn override_map_null_value_reads_as_empty() {
        let map: OverrideMap<Vec<Reward>> =
            serde_json::from_str(r#"{"a": null, "b": [{"type": "Experience", "value": 1}]}"#).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Vec::new()));
        assert_eq!(map.get("b").map(Vec::len), Some(1));
    }

    #[test]
    fn override_map_repeated_keys_stay_indexed() {
        let map: OverrideMap<usize> = (0..1000).map(|n| (format!("k{}", n % 10), n)).collect();
        assert_eq!(map.len(), 10);
        assert_eq!(map.get("k3"), Some(&993));
        assert_eq!(map.keys().nth(3), Some("k3"));
    }

    #[test]
    fn override_map_null_is_not_a_map() {
        let parsed: Option<OverrideMap<u32>> = serde_json::from_str("null").unwrap();
        assert!(parsed.is_none());
        assert!(serde_json::from_str::<OverrideMap<u32>>("[1, 2]").is_err());
    }

    #[test]
    fn reward_preserves_unknown_fields() {
        let raw = r#"{"id":"r1","type":"Item","index":0,"items":[{"_id":"i1","_tpl":"5447a9cd4bdc2dbd208b4567","upd":{"StackObjectsCount":1}}],"target":"i1","unknown":true}"#;
        let reward: Reward = serde_json::from_str(raw).unwrap();
        assert_eq!(reward.first_template(), Some("5447a9cd4bdc2dbd208b4567"));
        let back: Value = serde_json::to_value(&reward).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn reward_without_items_has_no_template() {
        let reward: Reward = serde_json::from_str(r#"{"type":"Experience","value":1500}"#).unwrap();
        assert_eq!(reward.first_template(), None);
        let empty: Reward = serde_json::from_str(r#"{"type":"Item","items":[]}"#).unwrap();
        assert_eq!(empty.first_template(), None);
    }

    #[test]
    fn started_bucket_created_once() {
        let mut quest = Quest::new(QuestId::parse(GUNSMITH_1).unwrap(), "Gunsmith - Part 1");
        assert!(quest.rewards.is_none());
        let (_, created) = quest.started_bucket_mut();
        assert!(created);
        let (_, created) = quest.started_bucket_mut();
        assert!(!created);
        assert!(quest.bucket(STARTED_BUCKET).is_empty());
    }

    #[test]
    fn null_started_bucket_loads_and_is_replaced() {
        let mut quest: Quest = serde_json::from_value(serde_json::json!({
            "_id": GUNSMITH_1,
            "QuestName": "Gunsmith - Part 1",
            "rewards": { "Started": null, "Success": [] },
        }))
        .unwrap();
        assert!(quest.bucket(STARTED_BUCKET).is_empty());

        let (started, created) = quest.started_bucket_mut();
        assert!(created);
        started.push(serde_json::from_str(r#"{"type":"Experience","value":1}"#).unwrap());
        assert_eq!(quest.bucket(STARTED_BUCKET).len(), 1);
        assert!(quest.bucket("Success").is_empty());
    }

    #[test]
    fn config_reads_pascal_case_and_legacy_keys() {
        let current: ModConfig =
            serde_json::from_str(r#"{"DefaultRewards": true, "LoreAccurate": false, "DebugLogging": true}"#).unwrap();
        assert!(current.default_rewards && !current.lore_accurate && current.debug_logging);

        let legacy: ModConfig =
            serde_json::from_str(r#"{"defaultRewards": true, "LoreAccurate": true, "debugLogging": false}"#).unwrap();
        assert!(legacy.default_rewards && legacy.lore_accurate && !legacy.debug_logging);

        let sparse: ModConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(sparse, ModConfig::default());
    }

    #[test]
    fn description_entry_missing_text_is_empty() {
        let entry: DescriptionEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(entry.text(), "");
        let null: DescriptionEntry = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.text(), "");
    }
}
