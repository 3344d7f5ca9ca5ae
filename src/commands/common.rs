use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::events::EventBus;
use crate::filter::SkillFilterManager;
use crate::page::Page;
use crate::storage::FileStore;

pub fn open_store(config: &Config) -> FileStore {
    FileStore::new(config.storage_file())
}

/// Manager over an empty page, for commands that only touch the stored
/// filters. Stored state is loaded before returning.
pub fn headless_manager(
    config_path: Option<PathBuf>,
) -> Result<(Config, SkillFilterManager<FileStore>)> {
    let config = Config::load(config_path)?;
    let store = open_store(&config);
    let page = Page::new("").into_shared();

    let mut manager = SkillFilterManager::new(&config, store, page, EventBus::new());
    manager.load_filters();
    Ok((config, manager))
}
