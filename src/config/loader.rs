use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::FilterState;

pub const DEFAULT_STORAGE_KEY: &str = "cw_skill_filters_v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Must match the presentation layer's transition length, or the end
    /// state flips before or after the visual transition finishes.
    pub animation_ms: u64,
    pub tab_reapply_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            animation_ms: 250,
            tab_reapply_delay_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn tab_reapply_delay(&self) -> Duration {
        Duration::from_millis(self.tab_reapply_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_key: String,
    pub storage_path: Option<PathBuf>,
    pub timing: TimingConfig,
    pub default_filters: FilterState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_path: None,
            timing: TimingConfig::default(),
            default_filters: FilterState::default(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = config_path.unwrap_or_else(Self::default_config_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn default_config_path() -> PathBuf {
        if let Some(config_path) = std::env::var_os("SKILLFILTER_CONFIG") {
            PathBuf::from(config_path)
        } else {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("skillfilter")
                .join("config.yaml")
        }
    }

    pub fn storage_file(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("skillfilter")
                .join("storage.json")
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.storage_file()
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(test)]
    pub fn with_storage_path(mut self, path: PathBuf) -> Self {
        self.storage_path = Some(path);
        self
    }
}
