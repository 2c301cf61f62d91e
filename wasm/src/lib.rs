use commit_grid::config::GridConfig;
use commit_grid::layout::Pagination;
use commit_grid::layout_dump::GridDump;
use commit_grid::layout_git_log;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitGridOptions {
    show_index: Option<bool>,
    pagination: Option<Pagination>,
    page_start: Option<usize>,
    page_size: Option<usize>,
    head_commit: Option<String>,
}

fn build_grid_config(options: CommitGridOptions) -> GridConfig {
    let mut grid = GridConfig::default();
    if let Some(show_index) = options.show_index {
        grid.show_index = show_index;
    }
    if let Some(pagination) = options.pagination {
        grid.pagination = pagination;
    }
    if let Some(page_start) = options.page_start {
        grid.page_start = page_start;
    }
    grid.page_size = options.page_size;
    grid.head_commit = options.head_commit;
    grid
}

fn layout_to_json(log: &str, options: CommitGridOptions) -> Result<String, String> {
    let result =
        layout_git_log(log, &build_grid_config(options)).map_err(|error| error.to_string())?;
    let dump = GridDump::from_layout(&result.layout, &result.input, &result.failures);
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_commit_grid(log: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<CommitGridOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        CommitGridOptions::default()
    };

    layout_to_json(log, options).map_err(|error| JsValue::from_str(&error))
}
