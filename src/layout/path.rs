use std::ops::RangeInclusive;

use super::ColumnState;
use crate::ir::{EdgeKind, Position};

/// Corner joining a horizontal connector to a vertical run, named after the
/// two cell sides it connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Curve {
    LeftDown,
    RightDown,
    LeftUp,
    RightUp,
}

impl Curve {
    pub(crate) fn state(self) -> ColumnState {
        let mut state = ColumnState::default();
        match self {
            Curve::LeftDown => state.is_left_down_curve = true,
            Curve::RightDown => state.is_right_down_curve = true,
            Curve::LeftUp => state.is_left_up_curve = true,
            Curve::RightUp => state.is_right_up_curve = true,
        }
        state
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Vertical {
        column: usize,
        rows: RangeInclusive<usize>,
    },
    Horizontal {
        row: usize,
        columns: RangeInclusive<usize>,
    },
    Corner {
        row: usize,
        column: usize,
        curve: Curve,
    },
}

/// Cells an edge passes through, from child to parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EdgePath {
    pub(crate) segments: Vec<Segment>,
}

impl EdgePath {
    /// Path between a child (upper) and its parent (lower). Same-column edges
    /// are a straight run. Merges converge on the child's row and drop down
    /// the parent's column; other cross-column edges run down the child's
    /// column and diverge on the parent's row. Both endpoint cells always
    /// carry a vertical segment.
    pub(crate) fn between(child: Position, parent: Position, kind: EdgeKind) -> Self {
        if child.column == parent.column {
            return Self {
                segments: vec![Segment::Vertical {
                    column: child.column,
                    rows: child.row..=parent.row,
                }],
            };
        }

        let segments = match kind {
            EdgeKind::Merge => {
                let curve = if parent.column > child.column {
                    Curve::LeftDown
                } else {
                    Curve::RightDown
                };
                vec![
                    Segment::Vertical {
                        column: child.column,
                        rows: child.row..=child.row,
                    },
                    Segment::Horizontal {
                        row: child.row,
                        columns: columns_towards(child.column, parent.column),
                    },
                    Segment::Corner {
                        row: child.row,
                        column: parent.column,
                        curve,
                    },
                    Segment::Vertical {
                        column: parent.column,
                        rows: child.row..=parent.row,
                    },
                ]
            }
            EdgeKind::Normal => {
                let curve = if child.column > parent.column {
                    Curve::LeftUp
                } else {
                    Curve::RightUp
                };
                vec![
                    Segment::Vertical {
                        column: child.column,
                        rows: child.row..=parent.row,
                    },
                    Segment::Vertical {
                        column: parent.column,
                        rows: parent.row..=parent.row,
                    },
                    Segment::Horizontal {
                        row: parent.row,
                        columns: columns_towards(parent.column, child.column),
                    },
                    Segment::Corner {
                        row: parent.row,
                        column: child.column,
                        curve,
                    },
                ]
            }
        };
        Self { segments }
    }

    /// Connector from a loaded node out to a virtual column, continuing
    /// vertically over `rows`.
    pub(crate) fn to_virtual_column(
        node: Position,
        virtual_column: usize,
        rows: RangeInclusive<usize>,
        continues_down: bool,
    ) -> Self {
        let curve = if continues_down {
            Curve::LeftDown
        } else {
            Curve::LeftUp
        };
        Self {
            segments: vec![
                Segment::Horizontal {
                    row: node.row,
                    columns: columns_towards(node.column, virtual_column),
                },
                Segment::Corner {
                    row: node.row,
                    column: virtual_column,
                    curve,
                },
                Segment::Vertical {
                    column: virtual_column,
                    rows,
                },
            ],
        }
    }

    pub(crate) fn vertical_runs(&self) -> impl Iterator<Item = (usize, &RangeInclusive<usize>)> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Vertical { column, rows } => Some((*column, rows)),
            _ => None,
        })
    }

    /// Every (row, column, state) the path marks, before clipping.
    pub(crate) fn cells(&self) -> Vec<(usize, usize, ColumnState)> {
        let mut cells = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Vertical { column, rows } => {
                    for row in rows.clone() {
                        cells.push((row, *column, ColumnState::VERTICAL));
                    }
                }
                Segment::Horizontal { row, columns } => {
                    for column in columns.clone() {
                        cells.push((*row, column, ColumnState::HORIZONTAL));
                    }
                }
                Segment::Corner { row, column, curve } => {
                    cells.push((*row, *column, curve.state()));
                }
            }
        }
        cells
    }
}

// Columns strictly after `from` up to and including `to`, in either direction.
fn columns_towards(from: usize, to: usize) -> RangeInclusive<usize> {
    if to > from { from + 1..=to } else { to..=from - 1 }
}
