use crate::layout::{ColumnLayout, ColumnState, LayoutInput};
use crate::parser::ParseFailure;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDump {
    pub graph_width: usize,
    pub virtual_columns: usize,
    pub total_columns: usize,
    pub head_commit: Option<String>,
    pub rows: Vec<RowDump>,
    pub parse_failures: Vec<FailureDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDump {
    pub row: usize,
    pub commit: Option<String>,
    pub columns: Vec<ColumnState>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDump {
    pub line_number: usize,
    pub line: String,
}

impl GridDump {
    pub fn from_layout(
        layout: &ColumnLayout,
        input: &LayoutInput,
        failures: &[ParseFailure],
    ) -> Self {
        let commits = commits_by_row(input);
        let rows = layout
            .rows
            .iter()
            .map(|(row, columns)| RowDump {
                row: *row,
                commit: commits.get(row).map(|hash| hash.to_string()),
                columns: columns.clone(),
            })
            .collect();

        let parse_failures = failures
            .iter()
            .map(|failure| FailureDump {
                line_number: failure.line_number,
                line: failure.line.clone(),
            })
            .collect();

        GridDump {
            graph_width: layout.graph_width,
            virtual_columns: layout.virtual_columns,
            total_columns: layout.total_columns(),
            head_commit: input.head_commit_hash.clone(),
            rows,
            parse_failures,
        }
    }
}

fn commits_by_row(input: &LayoutInput) -> HashMap<usize, &str> {
    input
        .positions
        .iter()
        .map(|(hash, position)| (position.row, hash.as_str()))
        .collect()
}

fn cell_glyph(state: &ColumnState) -> char {
    if state.is_index {
        '@'
    } else if state.is_node {
        '*'
    } else if state.is_left_down_curve || state.is_right_down_curve {
        '.'
    } else if state.is_left_up_curve || state.is_right_up_curve {
        '\''
    } else if state.is_top_break_point || state.is_bottom_break_point {
        ':'
    } else if state.is_vertical_line && state.is_horizontal_line {
        '+'
    } else if state.is_vertical_line {
        '|'
    } else if state.is_horizontal_line {
        '-'
    } else {
        ' '
    }
}

/// One line per row: the cells as ASCII glyphs followed by the commit on
/// that row and its subject.
pub fn render_text(layout: &ColumnLayout, input: &LayoutInput) -> String {
    let commits = commits_by_row(input);
    let messages: HashMap<&str, &str> = input
        .commits
        .iter()
        .map(|commit| (commit.hash.as_str(), commit.message.as_str()))
        .collect();

    let mut out = String::new();
    for (row, columns) in &layout.rows {
        let cells: String = columns.iter().map(cell_glyph).collect();
        out.push_str(cells.trim_end());
        if let Some(hash) = commits.get(row) {
            out.push_str("  ");
            out.push_str(hash);
            if let Some(message) = messages.get(hash).filter(|m| !m.is_empty()) {
                out.push(' ');
                out.push_str(message);
            }
        } else if columns.first().is_some_and(|state| state.is_index) {
            out.push_str("  (index)");
        }
        out.push('\n');
    }
    out
}

pub fn write_dump<W: Write>(writer: W, dump: &GridDump, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, dump)?;
    } else {
        serde_json::to_writer(writer, dump)?;
    }
    Ok(())
}

pub fn write_layout_dump(path: &Path, dump: &GridDump, pretty: bool) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_dump(&mut writer, dump, pretty)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
