#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod resolve;

#[cfg(feature = "cli")]
pub use cli::run;

use config::GridConfig;
use ir::History;
use layout::{ColumnLayout, LayoutError, LayoutInput, compute_layout};
use parser::{ParseFailure, parse_git_log};

/// Everything produced from one log: the engine input, the grid and the
/// lines that could not be parsed.
#[derive(Debug, Clone)]
pub struct GitLogLayout {
    pub input: LayoutInput,
    pub layout: ColumnLayout,
    pub failures: Vec<ParseFailure>,
}

/// Parses `log`, assigns lanes and computes the grid.
pub fn layout_git_log(log: &str, grid: &GridConfig) -> Result<GitLogLayout, LayoutError> {
    let parsed = parse_git_log(log);
    let history = History::from_entries(parsed.entries);
    let input = resolve::resolve_layout_input(&history, &grid.resolve_options(history.len()));
    let layout = compute_layout(&input)?;
    Ok(GitLogLayout {
        input,
        layout,
        failures: parsed.failures,
    })
}
