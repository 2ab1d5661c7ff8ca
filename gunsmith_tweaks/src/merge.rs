//! Validated merge of override data into the host quest table.
//!
//! Every entry runs through the same guard chain: key present, payload present,
//! well-formed quest id, quest exists, quest editable. Any failing guard skips
//! that one entry and processing moves on. Reward merges only append to the
//! quest's "Started" bucket; description merges replace the text outright.

use gunsmith_data::{DescriptionOverrides, Quest, QuestId, QuestTable, RewardOverrides};
use log::{info, warn};
use thiserror::Error;

use crate::editable::EditableSet;
use crate::host::{ItemNames, reward_display_name};

/// Why an override entry was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("skip entry with empty quest key")]
    EmptyKey,
    #[error("quest '{0}' has no rewards; skipping")]
    NoRewards(String),
    #[error("quest '{0}' has an empty description; skipping")]
    EmptyDescription(String),
    #[error("questKey '{0}' is not a valid quest id; skipping")]
    MalformedId(String),
    #[error("quest '{0}' not found in DB; skipping")]
    MissingQuest(QuestId),
    #[error("'{name}' ({id}) not in editable set; skipping")]
    NotEditable { id: QuestId, name: String },
}

impl SkipReason {
    /// Skips that only show up in debug output.
    pub fn is_quiet(&self) -> bool {
        matches!(self, SkipReason::NotEditable { .. })
    }
}

/// Outcome of one reward phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardTally {
    pub rewards_added: usize,
    pub quests_touched: usize,
}

/// Borrowed state for one run of the merge engine.
pub struct MergeContext<'a> {
    quests: &'a mut QuestTable,
    editable: &'a EditableSet,
    items: &'a dyn ItemNames,
    debug: bool,
}

impl<'a> MergeContext<'a> {
    /// `debug` is fixed for the life of the context.
    pub fn new(quests: &'a mut QuestTable, editable: &'a EditableSet, items: &'a dyn ItemNames, debug: bool) -> Self {
        Self {
            quests,
            editable,
            items,
            debug,
        }
    }

    /// Append each entry's rewards to its quest's "Started" bucket.
    ///
    /// `phase` only labels log lines. Quests touched counts entries applied,
    /// so it is not deduplicated across phases.
    pub fn apply_rewards(&mut self, phase: &str, overrides: &RewardOverrides) -> RewardTally {
        let mut tally = RewardTally::default();
        let (debug, editable, items) = (self.debug, self.editable, self.items);

        for (key, rewards) in overrides.iter() {
            if key.trim().is_empty() {
                report_skip(phase, &SkipReason::EmptyKey, debug);
                continue;
            }
            if rewards.is_empty() {
                report_skip(phase, &SkipReason::NoRewards(key.to_string()), debug);
                continue;
            }
            if debug {
                info!("{phase}: processing questKey={key}, rewards={}", rewards.len());
            }

            let quest = match resolve_quest(self.quests, editable, key) {
                Ok(quest) => quest,
                Err(reason) => {
                    report_skip(phase, &reason, debug);
                    continue;
                },
            };

            let (started, created) = quest.started_bucket_mut();
            started.extend(rewards.iter().cloned());
            if created && debug {
                info!("{phase}: created 'Started' bucket for '{}'", quest.name);
            }

            tally.rewards_added += rewards.len();
            tally.quests_touched += 1;

            if debug {
                for reward in rewards {
                    let tpl = reward.first_template().unwrap_or("null");
                    info!(
                        "{phase}: Quest='{}' ({key}) || Reward={} (tpl={tpl})",
                        quest.name,
                        reward_display_name(items, reward)
                    );
                }
            }
        }

        tally
    }

    /// Replace each entry's quest description. Returns the number replaced.
    pub fn apply_descriptions(&mut self, overrides: &DescriptionOverrides) -> usize {
        const PHASE: &str = "Descriptions";
        let mut updated = 0;
        let (debug, editable) = (self.debug, self.editable);

        for (key, entry) in overrides.iter() {
            if key.trim().is_empty() {
                report_skip(PHASE, &SkipReason::EmptyKey, debug);
                continue;
            }
            let text = entry.text();
            if text.trim().is_empty() {
                report_skip(PHASE, &SkipReason::EmptyDescription(key.to_string()), debug);
                continue;
            }

            let quest = match resolve_quest(self.quests, editable, key) {
                Ok(quest) => quest,
                Err(reason) => {
                    report_skip(PHASE, &reason, debug);
                    continue;
                },
            };

            quest.description = text.to_string();
            updated += 1;

            if debug {
                info!("{PHASE}: description set for '{}'", quest.name);
            }
        }

        updated
    }
}

/// Id format, existence, and editability checks, in that order.
fn resolve_quest<'q>(quests: &'q mut QuestTable, editable: &EditableSet, key: &str) -> Result<&'q mut Quest, SkipReason> {
    let id = QuestId::parse(key).map_err(|_| SkipReason::MalformedId(key.to_string()))?;
    let Some(quest) = quests.get_mut(&id) else {
        return Err(SkipReason::MissingQuest(id));
    };
    if !editable.contains(&id) {
        return Err(SkipReason::NotEditable {
            name: quest.name.clone(),
            id,
        });
    }
    Ok(quest)
}

fn report_skip(phase: &str, reason: &SkipReason, debug: bool) {
    if !reason.is_quiet() {
        warn!("{phase}: {reason}");
    } else if debug {
        info!("{phase}: {reason}");
    }
}
