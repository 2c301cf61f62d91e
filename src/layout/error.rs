use thiserror::Error;

use super::builder::Pass;

/// Contract violations in the layout input. Fatal to the computation: no
/// matrix is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("position references unknown commit {hash}")]
    UnknownCommit { hash: String },

    #[error("commit {hash} is in column {column}, graph width is {graph_width}")]
    ColumnOutOfBounds {
        hash: String,
        column: usize,
        graph_width: usize,
    },

    #[error("commits {first} and {second} both occupy row {row}, column {column}")]
    CellOccupied {
        row: usize,
        column: usize,
        first: String,
        second: String,
    },

    #[error("commit {hash} is positioned on row 0, which the index pseudo-commit reserves")]
    IndexRowOccupied { hash: String },

    #[error("edge endpoint {hash} has no position")]
    UnknownEdgeEndpoint { hash: String },

    #[error("edge from {child} to {parent} does not point down the grid")]
    InvertedEdge { child: String, parent: String },

    #[error("{pass:?} pass cannot run after the {after:?} pass")]
    PassOutOfOrder { pass: Pass, after: Pass },
}
