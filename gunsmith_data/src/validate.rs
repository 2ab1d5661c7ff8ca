use std::fmt;

use crate::*;

/// Length of a quest id in hex digits.
pub const QUEST_ID_LEN: usize = 24;

/// Validation error for malformed or unusable override data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MalformedQuestId { key: String },
    EmptyKey { file: String },
    EmptyRewards { file: String, key: String },
    EmptyDescription { file: String, key: String },
    NotEditable { file: String, key: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MalformedQuestId { key } => {
                write!(f, "'{key}' is not a valid quest id")
            },
            ValidationError::EmptyKey { file } => {
                write!(f, "{file}: entry with empty quest key")
            },
            ValidationError::EmptyRewards { file, key } => {
                write!(f, "{file}: quest '{key}' has no rewards")
            },
            ValidationError::EmptyDescription { file, key } => {
                write!(f, "{file}: quest '{key}' has an empty description")
            },
            ValidationError::NotEditable { file, key } => {
                write!(f, "{file}: quest '{key}' is not in the editable set")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// True if `raw` is exactly 24 hexadecimal digits (either case).
///
/// ```
/// use gunsmith_data::is_valid_quest_id;
///
/// assert!(is_valid_quest_id("5ac23c6186f7741247042bad"));
/// assert!(!is_valid_quest_id("notavalidid"));
/// ```
pub fn is_valid_quest_id(raw: &str) -> bool {
    raw.len() == QUEST_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Report every entry in a reward override file that the plugin would skip.
///
/// `editable` decides which quests the plugin may touch. Missing quests are not
/// reported because that depends on the host database.
pub fn lint_reward_overrides(
    file: &str,
    overrides: &RewardOverrides,
    editable: impl Fn(&QuestId) -> bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (key, rewards) in overrides.iter() {
        if key.trim().is_empty() {
            errors.push(ValidationError::EmptyKey { file: file.to_string() });
            continue;
        }
        if rewards.is_empty() {
            errors.push(ValidationError::EmptyRewards {
                file: file.to_string(),
                key: key.to_string(),
            });
        }
        check_key(file, key, &editable, &mut errors);
    }
    errors
}

/// Report every entry in a description override file that the plugin would skip.
pub fn lint_description_overrides(
    file: &str,
    overrides: &DescriptionOverrides,
    editable: impl Fn(&QuestId) -> bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (key, entry) in overrides.iter() {
        if key.trim().is_empty() {
            errors.push(ValidationError::EmptyKey { file: file.to_string() });
            continue;
        }
        if entry.text().trim().is_empty() {
            errors.push(ValidationError::EmptyDescription {
                file: file.to_string(),
                key: key.to_string(),
            });
        }
        check_key(file, key, &editable, &mut errors);
    }
    errors
}

fn check_key(file: &str, key: &str, editable: &impl Fn(&QuestId) -> bool, errors: &mut Vec<ValidationError>) {
    match QuestId::parse(key) {
        Ok(id) if !editable(&id) => errors.push(ValidationError::NotEditable {
            file: file.to_string(),
            key: key.to_string(),
        }),
        Ok(_) => {},
        Err(err) => errors.push(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward() -> Reward {
        serde_json::from_str(r#"{"type":"Item","items":[{"_tpl":"5447a9cd4bdc2dbd208b4567"}]}"#).unwrap()
    }

    #[test]
    fn lint_rewards_reports_each_problem() {
        let overrides: RewardOverrides = [
            ("5ac23c6186f7741247042bad", vec![reward()]),
            ("  ", vec![reward()]),
            ("notavalidid", vec![reward()]),
            ("5ac2426c86f774138762edfe", Vec::new()),
            ("000000000000000000000000", vec![reward()]),
        ]
        .into_iter()
        .collect();

        let errors = lint_reward_overrides("Default.json", &overrides, |id| id.as_str() != "000000000000000000000000");
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyKey {
                    file: "Default.json".into()
                },
                ValidationError::MalformedQuestId {
                    key: "notavalidid".into()
                },
                ValidationError::EmptyRewards {
                    file: "Default.json".into(),
                    key: "5ac2426c86f774138762edfe".into()
                },
                ValidationError::NotEditable {
                    file: "Default.json".into(),
                    key: "000000000000000000000000".into()
                },
            ]
        );
    }

    #[test]
    fn lint_descriptions_flags_blank_text() {
        let overrides: DescriptionOverrides = [
            (
                "5ac23c6186f7741247042bad",
                DescriptionEntry {
                    description: Some("New lore text".into()),
                },
            ),
            (
                "5ac2426c86f774138762edfe",
                DescriptionEntry {
                    description: Some("   ".into()),
                },
            ),
        ]
        .into_iter()
        .collect();

        let errors = lint_description_overrides("Descriptions.json", &overrides, |_| true);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Descriptions.json: quest '5ac2426c86f774138762edfe' has an empty description"
        );
    }
}
