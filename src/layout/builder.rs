use std::collections::{HashMap, HashSet};

use super::error::LayoutError;
use super::matrix::ColumnMatrix;
use super::path::EdgePath;
use super::virtual_columns::VirtualColumns;
use super::{ColumnLayout, ColumnState, LayoutInput, Pagination, RowWindow};
use crate::ir::{Edge, EdgeKind, Position};

/// Builder passes in the order they have to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pass {
    Edges,
    Nodes,
    BreakPoints,
    IndexEdge,
    VirtualEdges,
    Boundaries,
}

// Edge with exactly one endpoint on the loaded page.
#[derive(Debug, Clone)]
struct OffPageEdge {
    child: String,
    parent: String,
    anchor: Position,
    continues_down: bool,
}

impl OffPageEdge {
    fn new(edge: &Edge, child: Option<Position>, parent: Option<Position>) -> Option<Self> {
        let (anchor, continues_down) = match (child, parent) {
            (Some(child), None) => (child, true),
            (None, Some(parent)) => (parent, false),
            _ => return None,
        };
        Some(Self {
            child: edge.from.clone(),
            parent: edge.to.clone(),
            anchor,
            continues_down,
        })
    }
}

/// Populates the column-state matrix for one layout computation. The matrix
/// stays private until [`GraphMatrixBuilder::finish`] consumes the builder.
///
/// Passes must be called in [`Pass`] order; the index and virtual-edge passes
/// may be skipped. Calling a pass after a later one fails with
/// [`LayoutError::PassOutOfOrder`].
#[derive(Debug)]
pub struct GraphMatrixBuilder<'a> {
    positions: &'a HashMap<String, Position>,
    head_commit_hash: Option<&'a str>,
    graph_width: usize,
    window: RowWindow,
    pagination: Pagination,
    show_index: bool,
    matrix: ColumnMatrix,
    drawn: Vec<EdgePath>,
    off_page: Vec<OffPageEdge>,
    virtual_columns: VirtualColumns,
    stage: Option<Pass>,
}

impl<'a> GraphMatrixBuilder<'a> {
    pub fn new(input: &'a LayoutInput) -> Result<Self, LayoutError> {
        validate_positions(input)?;
        let graph_width = if input.show_index {
            input.graph_width.max(1)
        } else {
            input.graph_width
        };
        Ok(Self {
            positions: &input.positions,
            head_commit_hash: input.head_commit_hash.as_deref(),
            graph_width,
            window: input.window,
            pagination: input.pagination,
            show_index: input.show_index,
            matrix: ColumnMatrix::new(graph_width),
            drawn: Vec::new(),
            off_page: Vec::new(),
            virtual_columns: VirtualColumns::default(),
            stage: None,
        })
    }

    fn enter(&mut self, pass: Pass) -> Result<(), LayoutError> {
        if let Some(after) = self.stage
            && pass < after
        {
            return Err(LayoutError::PassOutOfOrder { pass, after });
        }
        self.stage = Some(pass);
        Ok(())
    }

    // Marks the visible part of a path.
    fn trace(&mut self, path: &EdgePath) {
        for (row, column, state) in path.cells() {
            if self.window.contains(row) {
                self.matrix.set(row, column, state);
            }
        }
    }

    pub fn draw_edges(&mut self, edges: &[Edge]) -> Result<(), LayoutError> {
        self.enter(Pass::Edges)?;
        for edge in edges {
            let child = self.positions.get(&edge.from).copied();
            let parent = self.positions.get(&edge.to).copied();
            match (child, parent) {
                (Some(child), Some(parent)) => {
                    if child.row >= parent.row {
                        return Err(LayoutError::InvertedEdge {
                            child: edge.from.clone(),
                            parent: edge.to.clone(),
                        });
                    }
                    let path = EdgePath::between(child, parent, edge.kind);
                    self.trace(&path);
                    self.drawn.push(path);
                }
                (None, None) => {
                    return Err(LayoutError::UnknownEdgeEndpoint {
                        hash: edge.from.clone(),
                    });
                }
                _ if self.pagination == Pagination::Server => {
                    if let Some(off_page) = OffPageEdge::new(edge, child, parent) {
                        self.off_page.push(off_page);
                    }
                }
                (None, _) => {
                    return Err(LayoutError::UnknownEdgeEndpoint {
                        hash: edge.from.clone(),
                    });
                }
                (_, None) => {
                    return Err(LayoutError::UnknownEdgeEndpoint {
                        hash: edge.to.clone(),
                    });
                }
            }
        }
        tracing::debug!(
            drawn = self.drawn.len(),
            off_page = self.off_page.len(),
            "drew edges"
        );
        Ok(())
    }

    pub fn draw_node(&mut self, hash: &str) -> Result<(), LayoutError> {
        self.enter(Pass::Nodes)?;
        let position =
            self.positions
                .get(hash)
                .copied()
                .ok_or_else(|| LayoutError::UnknownCommit {
                    hash: hash.to_string(),
                })?;
        if self.window.contains(position.row) {
            self.matrix
                .set(position.row, position.column, ColumnState::NODE);
        }
        Ok(())
    }

    /// Draws every positioned commit, in row order.
    pub fn draw_nodes(&mut self) -> Result<(), LayoutError> {
        self.enter(Pass::Nodes)?;
        let positions = self.positions;
        let mut hashes: Vec<&'a str> = positions.keys().map(String::as_str).collect();
        hashes.sort_by_key(|hash| (positions[*hash], *hash));
        for hash in hashes {
            self.draw_node(hash)?;
        }
        tracing::debug!(nodes = positions.len(), "drew nodes");
        Ok(())
    }

    /// Marks truncated lines on the window boundary: a vertical run entering
    /// from above gets a top break point on the first visible row, one
    /// leaving below gets a bottom break point on the last visible row.
    pub fn check_post_render_break_points(&mut self) -> Result<(), LayoutError> {
        self.enter(Pass::BreakPoints)?;
        let (Some(first), Some(last)) = (self.window.first_row(), self.window.last_row()) else {
            return Ok(());
        };
        let mut marks = Vec::new();
        for path in &self.drawn {
            for (column, rows) in path.vertical_runs() {
                if *rows.start() < first && *rows.end() >= first {
                    marks.push((first, column, ColumnState::TOP_BREAK));
                }
                if *rows.start() <= last && *rows.end() > last {
                    marks.push((last, column, ColumnState::BOTTOM_BREAK));
                }
            }
        }
        for (row, column, state) in marks {
            if self.matrix.get(row, column).is_vertical_line {
                self.matrix.set(row, column, state);
            }
        }
        Ok(())
    }

    pub fn draw_index_pseudo_commit_edge(&mut self) -> Result<(), LayoutError> {
        self.enter(Pass::IndexEdge)?;
        if !self.show_index || !self.window.contains(0) {
            return Ok(());
        }
        let index = Position::new(0, 0);
        self.matrix.set(
            index.row,
            index.column,
            ColumnState {
                is_node: true,
                is_index: true,
                ..ColumnState::default()
            },
        );
        let head = self
            .head_commit_hash
            .and_then(|hash| self.positions.get(hash))
            .copied()
            .filter(|position| self.window.contains(position.row));
        match head {
            Some(head) => {
                let path = EdgePath::between(index, head, EdgeKind::Normal);
                self.trace(&path);
            }
            None => {
                self.matrix
                    .set(index.row, index.column, ColumnState::BOTTOM_BREAK);
            }
        }
        Ok(())
    }

    /// Routes edges whose far end is not on the loaded page through virtual
    /// columns past the graph width, ending in a break point on the page
    /// boundary.
    pub fn draw_off_page_virtual_edges(&mut self) -> Result<(), LayoutError> {
        self.enter(Pass::VirtualEdges)?;
        if self.pagination != Pagination::Server {
            return Ok(());
        }
        let (Some(first), Some(last)) = (self.window.first_row(), self.window.last_row()) else {
            return Ok(());
        };
        let mut pending = std::mem::take(&mut self.off_page);
        pending.sort_by(|a, b| {
            (a.anchor.row, a.anchor.column, &a.child, &a.parent).cmp(&(
                b.anchor.row,
                b.anchor.column,
                &b.child,
                &b.parent,
            ))
        });

        for edge in pending {
            let rows = if edge.continues_down {
                if edge.anchor.row > last {
                    continue;
                }
                edge.anchor.row.max(first)..=last
            } else {
                if edge.anchor.row < first {
                    continue;
                }
                first..=edge.anchor.row.min(last)
            };
            let column = self.graph_width + self.virtual_columns.claim(rows.clone());
            if column >= self.matrix.columns() {
                self.matrix.widen(column + 1 - self.matrix.columns());
            }
            let path = EdgePath::to_virtual_column(edge.anchor, column, rows, edge.continues_down);
            self.trace(&path);
            // the far end is off the page; the near end may be off the window
            if edge.continues_down {
                self.matrix.set(last, column, ColumnState::BOTTOM_BREAK);
                if edge.anchor.row < first {
                    self.matrix.set(first, column, ColumnState::TOP_BREAK);
                }
            } else {
                self.matrix.set(first, column, ColumnState::TOP_BREAK);
                if edge.anchor.row > last {
                    self.matrix.set(last, column, ColumnState::BOTTOM_BREAK);
                }
            }
        }
        tracing::debug!(
            virtual_columns = self.virtual_columns.count(),
            "drew off-page edges"
        );
        Ok(())
    }

    /// Rows outside the window are ignored by both boundary marks.
    pub fn mark_first_row(&mut self, row: usize) -> Result<(), LayoutError> {
        self.enter(Pass::Boundaries)?;
        if !self.window.contains(row) {
            return Ok(());
        }
        self.matrix.set_row(
            row,
            ColumnState {
                is_first_row: true,
                ..ColumnState::default()
            },
        );
        Ok(())
    }

    pub fn mark_last_row(&mut self, row: usize) -> Result<(), LayoutError> {
        self.enter(Pass::Boundaries)?;
        if !self.window.contains(row) {
            return Ok(());
        }
        self.matrix.set_row(
            row,
            ColumnState {
                is_last_row: true,
                ..ColumnState::default()
            },
        );
        Ok(())
    }

    pub fn virtual_columns(&self) -> usize {
        self.virtual_columns.count()
    }

    pub fn finish(mut self) -> ColumnLayout {
        self.matrix.fill_rows(self.window.rows());
        ColumnLayout {
            graph_width: self.graph_width,
            virtual_columns: self.virtual_columns.count(),
            rows: self.matrix.into_value(),
        }
    }
}

fn validate_positions(input: &LayoutInput) -> Result<(), LayoutError> {
    let known: HashSet<&str> = input.commits.iter().map(|c| c.hash.as_str()).collect();
    let mut cells: HashMap<Position, &str> = HashMap::new();
    for (hash, position) in input.sorted_positions() {
        if !known.contains(hash) {
            return Err(LayoutError::UnknownCommit {
                hash: hash.to_string(),
            });
        }
        if position.column >= input.graph_width {
            return Err(LayoutError::ColumnOutOfBounds {
                hash: hash.to_string(),
                column: position.column,
                graph_width: input.graph_width,
            });
        }
        if input.show_index && position.row == 0 {
            return Err(LayoutError::IndexRowOccupied {
                hash: hash.to_string(),
            });
        }
        if let Some(first) = cells.insert(position, hash) {
            return Err(LayoutError::CellOccupied {
                row: position.row,
                column: position.column,
                first: first.to_string(),
                second: hash.to_string(),
            });
        }
    }
    Ok(())
}
