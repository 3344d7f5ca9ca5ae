use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::document::{Checkbox, FilterBar, Page};
use crate::models::level_label;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipSpec {
    pub level: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Wrap the checkbox in a chip that mirrors its state.
    #[serde(default = "default_true")]
    pub chip: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterBarSpec {
    #[serde(default)]
    pub chips: Vec<ChipSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSpec {
    #[serde(default)]
    pub skill: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabSpec {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub title: String,
    #[serde(default)]
    pub filter_bar: Option<FilterBarSpec>,
    #[serde(default)]
    pub tabs: Vec<TabSpec>,
}

fn default_true() -> bool {
    true
}

/// Level names are matched case-insensitively between chips and blocks.
fn normalize_level(level: &str) -> String {
    level.trim().to_lowercase()
}

impl PageSpec {
    pub fn into_page(self) -> Page {
        let mut page = Page::new(self.title);

        if let Some(bar) = self.filter_bar {
            let checkboxes = bar
                .chips
                .into_iter()
                .map(|spec| {
                    let level = normalize_level(&spec.level);
                    let label = spec.label.unwrap_or_else(|| level_label(&level));
                    let checkbox = Checkbox::new(level, label);
                    if spec.chip {
                        checkbox
                    } else {
                        checkbox.without_chip()
                    }
                })
                .collect();
            page = page.with_filter_bar(FilterBar { checkboxes });
        }

        for tab in self.tabs {
            let index = page.add_tab(tab.name);
            for block in tab.blocks {
                let skill = block.skill.as_deref().map(normalize_level);
                page.add_element(index, skill, block.title, block.body);
            }
        }

        page
    }
}

pub fn parse_page(content: &str) -> Result<Page> {
    let spec: PageSpec = serde_yaml::from_str(content).context("Failed to parse page document")?;
    Ok(spec.into_page())
}

pub fn load_page(path: &Path) -> Result<Page> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page file: {:?}", path))?;
    parse_page(&content).with_context(|| format!("Invalid page file: {:?}", path))
}
