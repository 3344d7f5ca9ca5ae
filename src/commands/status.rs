use anyhow::Result;
use clap::Args as ClapArgs;
use std::path::{Path, PathBuf};

use crate::commands::common;
use crate::models::{level_label, FilterState, SkillLevel};
use crate::storage::{PreferenceStore, StorageError};

#[derive(ClapArgs)]
pub struct Args {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: Args) -> Result<()> {
    let (config, manager) = common::headless_manager(args.config)?;
    let store = common::open_store(&config);

    let stored = store.get(&config.storage_key);
    let lines = report(
        store.path(),
        &config.storage_key,
        &stored,
        &manager.get_filters(),
    );
    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

fn source_line(path: &Path, stored: &Result<Option<String>, StorageError>) -> String {
    match stored {
        Ok(Some(raw)) if FilterState::from_json(raw).is_ok() => {
            format!("Stored filters: {}", path.display())
        }
        Ok(Some(_)) => "Stored filters unreadable, using defaults".to_string(),
        Ok(None) => "No stored filters, using defaults".to_string(),
        Err(e) => format!("Storage file unreadable ({}), using defaults", e),
    }
}

/// Every built-in level plus any custom level in the state, each marked
/// with whether it is effectively shown.
fn report(
    path: &Path,
    storage_key: &str,
    stored: &Result<Option<String>, StorageError>,
    filters: &FilterState,
) -> Vec<String> {
    let mut lines = vec![
        source_line(path, stored),
        format!("Key: {}", storage_key),
        String::new(),
    ];

    let mut levels: Vec<&str> = SkillLevel::all().into_iter().map(|l| l.as_str()).collect();
    for level in filters.levels() {
        if !levels.contains(&level) {
            levels.push(level);
        }
    }

    for level in levels {
        let enabled = filters.is_enabled(level);
        let marker = if enabled { "x" } else { " " };
        let state = if enabled { "shown" } else { "hidden" };
        lines.push(format!("  [{}] {:<14} {}", marker, level_label(level), state));
    }

    lines
}
