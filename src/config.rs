use crate::layout::{Pagination, RowWindow};
use crate::resolve::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub show_index: bool,
    pub pagination: Pagination,
    pub page_start: usize,
    /// Rows shown from `page_start`; the rest of the history when unset.
    pub page_size: Option<usize>,
    pub head_commit: Option<String>,
}

impl GridConfig {
    /// Options for a history of `loaded` commits.
    pub fn resolve_options(&self, loaded: usize) -> ResolveOptions {
        let total_rows = loaded + usize::from(self.show_index);
        let window = match (self.page_start, self.page_size) {
            (0, None) => None,
            (start, size) => Some(RowWindow::new(
                start,
                size.unwrap_or_else(|| total_rows.saturating_sub(start)),
            )),
        };
        ResolveOptions {
            show_index: self.show_index,
            pagination: self.pagination,
            window,
            head_commit: self.head_commit.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    pub pretty: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub grid: GridConfig,
    pub dump: DumpConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    show_index: Option<bool>,
    pagination: Option<Pagination>,
    page_start: Option<usize>,
    page_size: Option<usize>,
    head_commit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DumpConfigFile {
    pretty: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    grid: Option<GridConfigFile>,
    dump: Option<DumpConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(grid) = parsed.grid {
        if let Some(v) = grid.show_index {
            config.grid.show_index = v;
        }
        if let Some(v) = grid.pagination {
            config.grid.pagination = v;
        }
        if let Some(v) = grid.page_start {
            config.grid.page_start = v;
        }
        if let Some(v) = grid.page_size {
            config.grid.page_size = Some(v);
        }
        if let Some(v) = grid.head_commit {
            config.grid.head_commit = Some(v);
        }
    }

    if let Some(dump) = parsed.dump
        && let Some(v) = dump.pretty
    {
        config.dump.pretty = v;
    }

    Ok(config)
}
