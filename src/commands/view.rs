use anyhow::Result;
use clap::Args as ClapArgs;
use std::path::PathBuf;

use crate::commands::common;
use crate::config::Config;
use crate::events::EventBus;
use crate::filter::SkillFilterManager;
use crate::logging;
use crate::page::load_page;
use crate::viewer::ViewerApp;

#[derive(ClapArgs)]
pub struct Args {
    /// Page document (YAML) to open
    pub page: PathBuf,

    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: Args) -> Result<()> {
    let config = Config::load(args.config)?;
    let _log_guard = logging::init_file(&config.log_dir())?;

    let page = load_page(&args.page)?.into_shared();
    let store = common::open_store(&config);
    let manager = SkillFilterManager::new(&config, store, page, EventBus::new());

    tracing::info!("Opening {:?}", args.page);
    let mut app = ViewerApp::new(manager);
    app.run().await?;

    Ok(())
}
