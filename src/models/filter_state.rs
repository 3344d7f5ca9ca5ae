use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::SkillLevel;

#[derive(Debug, Error)]
pub enum FilterParseError {
    #[error("Invalid filter JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Filter record is not a JSON object")]
    NotAnObject,
}

/// Which skill levels are shown, keyed by level name.
///
/// A level with no entry counts as shown: only an explicit `false` hides
/// content. Serialized as a flat JSON object, e.g.
/// `{"advanced":false,"beginner":true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, bool>);

impl FilterState {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_enabled(&self, level: &str) -> bool {
        self.0.get(level).copied() != Some(false)
    }

    pub fn set(&mut self, level: impl Into<String>, enabled: bool) {
        self.0.insert(level.into(), enabled);
    }

    pub fn get(&self, level: &str) -> Option<bool> {
        self.0.get(level).copied()
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Enabled levels in key order.
    pub fn enabled_levels(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(level, _)| level)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Parses a persisted record. The record must be a JSON object; any
    /// value other than `false` is read as enabled.
    pub fn from_json(raw: &str) -> Result<Self, FilterParseError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(FilterParseError::NotAnObject)?;

        let map = object
            .iter()
            .map(|(level, v)| (level.clone(), v.as_bool() != Some(false)))
            .collect();
        Ok(Self(map))
    }
}

impl Default for FilterState {
    fn default() -> Self {
        let map = SkillLevel::all()
            .iter()
            .map(|level| (level.as_str().to_string(), level.enabled_by_default()))
            .collect();
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
