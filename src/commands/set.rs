use anyhow::{Context, Result};
use clap::{Args as ClapArgs, ValueEnum};
use std::path::PathBuf;

use crate::commands::common;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(ClapArgs)]
pub struct Args {
    /// Skill level to change (e.g. beginner, intermediate, advanced)
    pub level: String,

    /// Show (on) or hide (off) content at this level
    #[arg(value_enum)]
    pub state: Toggle,

    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct BulkArgs {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: Args) -> Result<()> {
    let level = args.level.trim().to_lowercase();
    let enabled = args.state == Toggle::On;

    let (_, mut manager) = common::headless_manager(args.config)?;
    manager
        .set_filter(&level, enabled)
        .with_context(|| format!("Failed to save filter for {}", level))?;

    println!(
        "{}: {}",
        level,
        if enabled { "shown" } else { "hidden" }
    );
    Ok(())
}

pub async fn show_all(args: BulkArgs) -> Result<()> {
    let (_, mut manager) = common::headless_manager(args.config)?;
    manager.show_all().context("Failed to save filters")?;
    println!("All skill levels shown");
    Ok(())
}

pub async fn hide_all(args: BulkArgs) -> Result<()> {
    let (_, mut manager) = common::headless_manager(args.config)?;
    manager.hide_all().context("Failed to save filters")?;
    println!("All skill levels hidden");
    Ok(())
}
