use std::collections::BTreeMap;
use std::ops::Range;

use super::ColumnState;

/// Row index -> fixed-length column states. Writes are additive.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnMatrix {
    rows: BTreeMap<usize, Vec<ColumnState>>,
    columns: usize,
}

impl ColumnMatrix {
    pub(crate) fn new(columns: usize) -> Self {
        Self {
            rows: BTreeMap::new(),
            columns,
        }
    }

    pub(crate) fn columns(&self) -> usize {
        self.columns
    }

    pub(crate) fn get(&self, row: usize, column: usize) -> ColumnState {
        self.rows
            .get(&row)
            .and_then(|states| states.get(column))
            .copied()
            .unwrap_or_default()
    }

    /// Writes past the matrix width are dropped; `widen` first.
    pub(crate) fn set(&mut self, row: usize, column: usize, state: ColumnState) {
        if column >= self.columns {
            return;
        }
        let columns = self.columns;
        let states = self
            .rows
            .entry(row)
            .or_insert_with(|| vec![ColumnState::default(); columns]);
        states[column] = states[column].merge(state);
    }

    /// Merges `state` into every column of `row`.
    pub(crate) fn set_row(&mut self, row: usize, state: ColumnState) {
        for column in 0..self.columns {
            self.set(row, column, state);
        }
    }

    /// Appends `extra` empty columns to every row.
    pub(crate) fn widen(&mut self, extra: usize) {
        self.columns += extra;
        let columns = self.columns;
        for states in self.rows.values_mut() {
            states.resize(columns, ColumnState::default());
        }
    }

    /// Makes sure every row of `rows` exists, even when nothing was drawn on it.
    pub(crate) fn fill_rows(&mut self, rows: Range<usize>) {
        let columns = self.columns;
        for row in rows {
            self.rows
                .entry(row)
                .or_insert_with(|| vec![ColumnState::default(); columns]);
        }
    }

    pub(crate) fn value(&self) -> &BTreeMap<usize, Vec<ColumnState>> {
        &self.rows
    }

    pub(crate) fn into_value(self) -> BTreeMap<usize, Vec<ColumnState>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_cells_default_to_empty() {
        let matrix = ColumnMatrix::new(3);
        assert_eq!(matrix.get(4, 2), ColumnState::default());
        assert_eq!(matrix.get(0, 99), ColumnState::default());
        assert!(matrix.value().is_empty());
    }

    #[test]
    fn set_merges_instead_of_overwriting() {
        let mut matrix = ColumnMatrix::new(2);
        matrix.set(1, 0, ColumnState::NODE);
        matrix.set(1, 0, ColumnState::BOTTOM_BREAK);
        matrix.set(1, 0, ColumnState::default());
        let state = matrix.get(1, 0);
        assert!(state.is_node);
        assert!(state.is_bottom_break_point);
        assert_eq!(matrix.value()[&1].len(), 2);
    }

    #[test]
    fn set_past_width_is_dropped() {
        let mut matrix = ColumnMatrix::new(2);
        matrix.set(0, 2, ColumnState::NODE);
        assert!(matrix.value().is_empty());
        matrix.widen(1);
        matrix.set(0, 2, ColumnState::NODE);
        assert!(matrix.get(0, 2).is_node);
    }

    #[test]
    fn widen_keeps_rows_fixed_length() {
        let mut matrix = ColumnMatrix::new(1);
        matrix.set(0, 0, ColumnState::VERTICAL);
        matrix.widen(2);
        matrix.set(3, 2, ColumnState::HORIZONTAL);
        matrix.fill_rows(0..5);
        assert_eq!(matrix.columns(), 3);
        assert!(matrix.value().values().all(|states| states.len() == 3));
        assert_eq!(matrix.value().len(), 5);
        assert!(matrix.get(0, 0).is_vertical_line);
        assert!(matrix.get(3, 2).is_horizontal_line);
    }

    #[test]
    fn set_row_marks_every_column() {
        let mut matrix = ColumnMatrix::new(3);
        matrix.set_row(
            2,
            ColumnState {
                is_last_row: true,
                ..ColumnState::default()
            },
        );
        assert!((0..3).all(|column| matrix.get(2, column).is_last_row));
        assert!((0..3).all(|column| matrix.get(2, column).is_empty()));
    }
}
