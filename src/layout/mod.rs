mod builder;
mod error;
mod matrix;
mod path;
pub(crate) mod types;
mod virtual_columns;

pub use builder::{GraphMatrixBuilder, Pass};
pub use error::LayoutError;
pub use types::*;

/// Runs every builder pass over `input` and returns the finished grid. Index
/// and virtual-edge passes are no-ops unless enabled on the input.
pub fn compute_layout(input: &LayoutInput) -> Result<ColumnLayout, LayoutError> {
    let mut builder = GraphMatrixBuilder::new(input)?;
    builder.draw_edges(&input.edges)?;
    builder.draw_nodes()?;
    builder.check_post_render_break_points()?;
    if input.show_index {
        builder.draw_index_pseudo_commit_edge()?;
    }
    if input.pagination == Pagination::Server {
        builder.draw_off_page_virtual_edges()?;
    }
    if let Some(first) = input.window.first_row() {
        builder.mark_first_row(first)?;
    }
    if let Some(last) = input.window.last_row() {
        builder.mark_last_row(last)?;
    }
    let layout = builder.finish();
    tracing::debug!(
        rows = layout.rows.len(),
        columns = layout.total_columns(),
        virtual_columns = layout.virtual_columns,
        "computed commit grid"
    );
    Ok(layout)
}

/// Memoised [`compute_layout`]: the grid is rebuilt from scratch whenever the
/// input differs from the one it was computed for.
#[derive(Debug, Default)]
pub struct LayoutQuery {
    cached: Option<(LayoutInput, ColumnLayout)>,
    rebuilds: usize,
}

impl LayoutQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&mut self, input: &LayoutInput) -> Result<&ColumnLayout, LayoutError> {
        let entry = match self.cached.take() {
            Some(entry) if entry.0 == *input => entry,
            _ => {
                let layout = compute_layout(input)?;
                self.rebuilds += 1;
                (input.clone(), layout)
            }
        };
        Ok(&self.cached.insert(entry).1)
    }

    /// Number of times the grid was computed rather than served from cache.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
