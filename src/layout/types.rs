use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use crate::ir::{Commit, Edge, Position};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Render state of one grid cell. Every flag defaults to false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnState {
    #[serde(skip_serializing_if = "is_false")]
    pub is_node: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_index: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_vertical_line: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_horizontal_line: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_left_down_curve: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_right_down_curve: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_left_up_curve: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_right_up_curve: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_top_break_point: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_bottom_break_point: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_first_row: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_last_row: bool,
}

impl ColumnState {
    pub const NODE: Self = Self {
        is_node: true,
        ..Self::EMPTY
    };
    pub const VERTICAL: Self = Self {
        is_vertical_line: true,
        ..Self::EMPTY
    };
    pub const HORIZONTAL: Self = Self {
        is_horizontal_line: true,
        ..Self::EMPTY
    };
    pub const TOP_BREAK: Self = Self {
        is_top_break_point: true,
        ..Self::EMPTY
    };
    pub const BOTTOM_BREAK: Self = Self {
        is_bottom_break_point: true,
        ..Self::EMPTY
    };
    pub const EMPTY: Self = Self {
        is_node: false,
        is_index: false,
        is_vertical_line: false,
        is_horizontal_line: false,
        is_left_down_curve: false,
        is_right_down_curve: false,
        is_left_up_curve: false,
        is_right_up_curve: false,
        is_top_break_point: false,
        is_bottom_break_point: false,
        is_first_row: false,
        is_last_row: false,
    };

    /// Additive merge: a flag set on either side stays set.
    pub fn merge(self, other: Self) -> Self {
        Self {
            is_node: self.is_node || other.is_node,
            is_index: self.is_index || other.is_index,
            is_vertical_line: self.is_vertical_line || other.is_vertical_line,
            is_horizontal_line: self.is_horizontal_line || other.is_horizontal_line,
            is_left_down_curve: self.is_left_down_curve || other.is_left_down_curve,
            is_right_down_curve: self.is_right_down_curve || other.is_right_down_curve,
            is_left_up_curve: self.is_left_up_curve || other.is_left_up_curve,
            is_right_up_curve: self.is_right_up_curve || other.is_right_up_curve,
            is_top_break_point: self.is_top_break_point || other.is_top_break_point,
            is_bottom_break_point: self.is_bottom_break_point || other.is_bottom_break_point,
            is_first_row: self.is_first_row || other.is_first_row,
            is_last_row: self.is_last_row || other.is_last_row,
        }
    }

    /// True when nothing would be drawn. Boundary markers do not count.
    pub fn is_empty(&self) -> bool {
        Self {
            is_first_row: false,
            is_last_row: false,
            ..*self
        } == Self::EMPTY
    }

    /// True when every flag set on `earlier` is still set on `self`.
    pub fn contains(&self, earlier: &Self) -> bool {
        self.merge(*earlier) == *self
    }

    pub fn has_curve(&self) -> bool {
        self.is_left_down_curve
            || self.is_right_down_curve
            || self.is_left_up_curve
            || self.is_right_up_curve
    }
}

/// Visible rows `start..start + count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowWindow {
    pub start: usize,
    pub count: usize,
}

impl RowWindow {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.start.saturating_add(self.count)
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn first_row(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start)
    }

    pub fn last_row(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.start.saturating_add(self.count - 1))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pagination {
    /// Positions cover the whole history; the window is a slice of it.
    #[default]
    Client,
    /// Positions cover only the loaded page; edges may point off it.
    Server,
}

/// Everything one layout computation depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutInput {
    pub commits: Vec<Commit>,
    pub positions: HashMap<String, Position>,
    pub edges: Vec<Edge>,
    pub graph_width: usize,
    pub head_commit_hash: Option<String>,
    pub window: RowWindow,
    pub pagination: Pagination,
    pub show_index: bool,
}

impl LayoutInput {
    /// Positions ordered by row, then column.
    pub fn sorted_positions(&self) -> Vec<(&str, Position)> {
        let mut positions: Vec<(&str, Position)> = self
            .positions
            .iter()
            .map(|(hash, position)| (hash.as_str(), *position))
            .collect();
        positions.sort_by_key(|(hash, position)| (*position, *hash));
        positions
    }
}

/// Finished grid handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub rows: BTreeMap<usize, Vec<ColumnState>>,
    pub graph_width: usize,
    pub virtual_columns: usize,
}

impl ColumnLayout {
    pub fn get(&self, row: usize, column: usize) -> ColumnState {
        self.rows
            .get(&row)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_columns(&self) -> usize {
        self.graph_width + self.virtual_columns
    }

    pub fn row(&self, row: usize) -> Option<&[ColumnState]> {
        self.rows.get(&row).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells with `is_node` set, in row-major order.
    pub fn nodes(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .flat_map(|(row, columns)| {
                columns
                    .iter()
                    .enumerate()
                    .filter(|(_, state)| state.is_node)
                    .map(move |(column, _)| (*row, column))
            })
            .collect()
    }
}
