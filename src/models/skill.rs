use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in skill levels. Pages may tag content with other level names;
/// those are carried as plain strings in [`super::FilterState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn all() -> [SkillLevel; 3] {
        [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        }
    }

    /// Shown on first visit, before anything has been persisted.
    pub fn enabled_by_default(&self) -> bool {
        !matches!(self, SkillLevel::Advanced)
    }

    pub fn from_name(name: &str) -> Option<SkillLevel> {
        Self::all()
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display label for any level name, built-in or custom.
pub fn level_label(name: &str) -> String {
    match SkillLevel::from_name(name) {
        Some(level) => level.label().to_string(),
        None => {
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
