use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use std::path::PathBuf;

use crate::commands::common;
use crate::config::Config;
use crate::storage::PreferenceStore;

#[derive(ClapArgs)]
pub struct Args {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: Args) -> Result<()> {
    let config = Config::load(args.config)?;
    let store = common::open_store(&config);

    store
        .remove(&config.storage_key)
        .with_context(|| format!("Failed to reset filters in {:?}", store.path()))?;
    tracing::info!("Removed stored filters under {}", config.storage_key);

    println!("Filters reset to defaults");
    Ok(())
}
