//! One-shot run of the plugin: config, then each enabled phase, then the summary.
//!
//! ```text
//! Idle ──DefaultRewards──▶ DefaultRewards ──LoreAccurate──▶ LoreRewards ──▶ Descriptions ──▶ Done
//!   └──────── off ─────────────▶ Done ◀──────── off ──────────┘
//! ```

use anyhow::{Context, Result};
use gunsmith_data::{ModConfig, QuestTable};
use log::info;

use crate::editable::EditableSet;
use crate::host::ItemNames;
use crate::loader::{ModDirectory, OverrideFile, OverrideSource};
use crate::merge::MergeContext;
use crate::report::RunReport;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    Idle,
    DefaultRewards,
    LoreRewards,
    Descriptions,
    Done,
}

impl RunPhase {
    /// The phase that follows `self` under `config`. `Done` is terminal.
    pub fn next(self, config: &ModConfig) -> RunPhase {
        match self {
            RunPhase::Idle if config.default_rewards => RunPhase::DefaultRewards,
            RunPhase::DefaultRewards if config.lore_accurate => RunPhase::LoreRewards,
            RunPhase::LoreRewards => RunPhase::Descriptions,
            RunPhase::Idle | RunPhase::DefaultRewards | RunPhase::Descriptions | RunPhase::Done => RunPhase::Done,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RunPhase::Idle => "Idle",
            RunPhase::DefaultRewards => "Default",
            RunPhase::LoreRewards => "LoreAccurate",
            RunPhase::Descriptions => "Descriptions",
            RunPhase::Done => "Done",
        }
    }
}

/// The plugin. Consumed by [`GunsmithTweaks::run`], so a run can never be repeated.
pub struct GunsmithTweaks<S> {
    source: S,
    editable: EditableSet,
}

impl<S: OverrideSource> GunsmithTweaks<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            editable: EditableSet::gunsmith(),
        }
    }

    /// Apply every enabled phase to `quests`.
    ///
    /// Each phase logs its summary line when it finishes.
    ///
    /// # Errors
    /// - if the config cannot be loaded
    /// - if an enabled phase's override file cannot be loaded; phases after it do not
    ///   run, and the [`RunReport`] of the phases before it is attached as context
    pub fn run(self, quests: &mut QuestTable, items: &dyn ItemNames) -> Result<RunReport> {
        info!("Applying Gunsmith tweaks…");
        let config = self.source.load_config().context("while loading mod config")?;
        let debug = config.debug_logging;

        let mut ctx = MergeContext::new(quests, &self.editable, items, debug);
        let mut report = RunReport::default();
        let mut phase = RunPhase::Idle;

        loop {
            let next = phase.next(&config);
            match (phase, next) {
                (RunPhase::Idle, RunPhase::Done) if debug => info!("Mod disabled"),
                (RunPhase::DefaultRewards, RunPhase::Done) if debug => info!("Lore Accurate disabled"),
                _ => {},
            }

            match next {
                RunPhase::DefaultRewards => {
                    let overrides = self
                        .source
                        .load_rewards(OverrideFile::Default)
                        .with_context(|| report.clone())
                        .with_context(|| load_failed(next))?;
                    let tally = ctx.apply_rewards(next.label(), &overrides);
                    report.record_rewards(next, tally);
                },
                RunPhase::LoreRewards => {
                    info!("Lore accurate rewards enabled.");
                    let overrides = self
                        .source
                        .load_rewards(OverrideFile::LoreAccurate)
                        .with_context(|| report.clone())
                        .with_context(|| load_failed(next))?;
                    let tally = ctx.apply_rewards(next.label(), &overrides);
                    report.record_rewards(next, tally);
                },
                RunPhase::Descriptions => {
                    let overrides = self
                        .source
                        .load_descriptions()
                        .with_context(|| report.clone())
                        .with_context(|| load_failed(next))?;
                    let updated = ctx.apply_descriptions(&overrides);
                    report.record_descriptions(updated);
                },
                RunPhase::Idle | RunPhase::Done => break,
            }
            phase = next;
        }

        if report.completed.is_empty() {
            info!("Gunsmith tweaks: no phases ran.");
        }
        Ok(report)
    }
}

fn load_failed(phase: RunPhase) -> String {
    format!("while loading overrides for the {} phase", phase.label())
}

/// Host entry point: run once against the detected mod directory.
///
/// # Errors
/// See [`GunsmithTweaks::run`].
pub fn on_load(quests: &mut QuestTable, items: &dyn ItemNames) -> Result<RunReport> {
    GunsmithTweaks::new(ModDirectory::detect()).run(quests, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(default_rewards: bool, lore_accurate: bool) -> ModConfig {
        ModConfig {
            default_rewards,
            lore_accurate,
            debug_logging: false,
        }
    }

    fn walk(config: &ModConfig) -> Vec<RunPhase> {
        let mut phases = vec![RunPhase::Idle];
        while *phases.last().unwrap() != RunPhase::Done {
            let next = phases.last().unwrap().next(config);
            phases.push(next);
        }
        phases
    }

    #[test]
    fn all_phases_when_both_flags_on() {
        assert_eq!(
            walk(&config(true, true)),
            vec![
                RunPhase::Idle,
                RunPhase::DefaultRewards,
                RunPhase::LoreRewards,
                RunPhase::Descriptions,
                RunPhase::Done
            ]
        );
    }

    #[test]
    fn lore_off_stops_after_default() {
        assert_eq!(
            walk(&config(true, false)),
            vec![RunPhase::Idle, RunPhase::DefaultRewards, RunPhase::Done]
        );
    }

    #[test]
    fn default_off_skips_everything_even_with_lore_on() {
        assert_eq!(walk(&config(false, true)), vec![RunPhase::Idle, RunPhase::Done]);
    }

    #[test]
    fn done_is_terminal() {
        assert_eq!(RunPhase::Done.next(&config(true, true)), RunPhase::Done);
    }
}
