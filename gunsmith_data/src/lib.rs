//! Shared data model for Gunsmith Tweaks.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, is_valid_quest_id, lint_description_overrides, lint_reward_overrides};
