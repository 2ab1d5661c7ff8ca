//! Run counters and the per-phase summary lines.

use std::fmt;

use log::info;

use crate::merge::RewardTally;
use crate::orchestrator::RunPhase;

/// Counters for one run. Fresh for every run and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub default_rewards_added: usize,
    pub default_quests_touched: usize,
    pub lore_rewards_added: usize,
    pub lore_quests_touched: usize,
    pub descriptions_updated: usize,
    /// Phases that ran to completion, in order.
    pub completed: Vec<RunPhase>,
}

impl RunReport {
    pub fn ran(&self, phase: RunPhase) -> bool {
        self.completed.contains(&phase)
    }

    pub(crate) fn record_rewards(&mut self, phase: RunPhase, tally: RewardTally) {
        match phase {
            RunPhase::DefaultRewards => {
                self.default_rewards_added = tally.rewards_added;
                self.default_quests_touched = tally.quests_touched;
            },
            RunPhase::LoreRewards => {
                self.lore_rewards_added = tally.rewards_added;
                self.lore_quests_touched = tally.quests_touched;
            },
            _ => return,
        }
        self.complete(phase);
    }

    pub(crate) fn record_descriptions(&mut self, updated: usize) {
        self.descriptions_updated = updated;
        self.complete(RunPhase::Descriptions);
    }

    /// The summary line is logged as soon as a phase finishes, so a later
    /// failing phase cannot hide it.
    fn complete(&mut self, phase: RunPhase) {
        self.completed.push(phase);
        if let Some(line) = self.phase_line(phase) {
            info!("{line}");
        }
    }

    fn phase_line(&self, phase: RunPhase) -> Option<String> {
        match phase {
            RunPhase::DefaultRewards => Some(format!(
                "Default: applied {} rewards to {} quests.",
                self.default_rewards_added, self.default_quests_touched
            )),
            RunPhase::LoreRewards => Some(format!(
                "LoreAccurate: applied {} rewards to {} quests.",
                self.lore_rewards_added, self.lore_quests_touched
            )),
            RunPhase::Descriptions => Some(format!("Descriptions: updated {} quests.", self.descriptions_updated)),
            RunPhase::Idle | RunPhase::Done => None,
        }
    }

    /// One line per phase that ran.
    pub fn summary_lines(&self) -> Vec<String> {
        self.completed.iter().filter_map(|&phase| self.phase_line(phase)).collect()
    }
}

/// Used as error context when a phase fails, carrying what already ran.
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.completed.is_empty() {
            return f.write_str("no phases completed");
        }
        write!(f, "completed before failure: {}", self.summary_lines().join(" "))
    }
}
