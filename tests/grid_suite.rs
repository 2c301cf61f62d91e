use std::path::Path;

use commit_grid::config::GridConfig;
use commit_grid::ir::EdgeKind;
use commit_grid::layout::{LayoutQuery, Pagination};
use commit_grid::parser::parse_git_log;
use commit_grid::{GitLogLayout, layout_git_log};

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("fixture read failed")
}

fn layout_fixture(name: &str, grid: &GridConfig) -> GitLogLayout {
    layout_git_log(&read_fixture(name), grid).expect("layout failed")
}

fn assert_grid_invariants(result: &GitLogLayout, fixture: &str) {
    let layout = &result.layout;
    let width = layout.total_columns();
    for (row, columns) in &layout.rows {
        assert_eq!(columns.len(), width, "{fixture}: row {row} has wrong width");
    }

    let mut expected: Vec<(usize, usize)> = result
        .input
        .positions
        .values()
        .filter(|position| result.input.window.contains(position.row))
        .map(|position| (position.row, position.column))
        .collect();
    expected.sort();
    let nodes: Vec<(usize, usize)> = layout
        .nodes()
        .into_iter()
        .filter(|(row, column)| !layout.get(*row, *column).is_index)
        .collect();
    assert_eq!(nodes, expected, "{fixture}: node cells differ from positions");

    // cross-column edges join both lanes on the row where they turn
    for edge in &result.input.edges {
        let (Some(child), Some(parent)) = (
            result.input.positions.get(&edge.from),
            result.input.positions.get(&edge.to),
        ) else {
            continue;
        };
        if child.column == parent.column {
            continue;
        }
        let (row, own, other) = match edge.kind {
            EdgeKind::Normal => (parent.row, parent.column, child.column),
            EdgeKind::Merge => (child.row, child.column, parent.column),
        };
        if !result.input.window.contains(row) {
            continue;
        }
        let name = format!("{fixture}: edge {} -> {}", edge.from, edge.to);
        assert!(layout.get(row, own).is_vertical_line, "{name}: endpoint lane");
        assert!(layout.get(row, other).is_vertical_line, "{name}: turning lane");
        assert!(layout.get(row, other).is_horizontal_line, "{name}: connector");
    }

    if let Some(first) = result.input.window.first_row() {
        assert!(
            layout.rows[&first].iter().all(|state| state.is_first_row),
            "{fixture}: first row not marked"
        );
    }
    if let Some(last) = result.input.window.last_row() {
        assert!(
            layout.rows[&last].iter().all(|state| state.is_last_row),
            "{fixture}: last row not marked"
        );
    }
}

#[test]
fn lay_out_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = ["linear.log", "merge.log", "malformed.log", "page.log"];
    let grids = [
        GridConfig::default(),
        GridConfig {
            show_index: true,
            ..GridConfig::default()
        },
        GridConfig {
            pagination: Pagination::Server,
            ..GridConfig::default()
        },
        GridConfig {
            page_start: 1,
            page_size: Some(2),
            ..GridConfig::default()
        },
    ];
    for fixture in fixtures {
        for grid in &grids {
            let result = layout_fixture(fixture, grid);
            assert_grid_invariants(&result, fixture);
        }
    }
}

#[test]
fn malformed_line_is_reported_and_skipped() {
    let parsed = parse_git_log(&read_fixture("malformed.log"));
    assert_eq!(parsed.entries.len(), 3);
    assert_eq!(parsed.failure_count(), 1);
    assert_eq!(parsed.failures[0].line_number, 2);

    let result = layout_fixture("malformed.log", &GridConfig::default());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.layout.nodes().len(), 3);
}

#[test]
fn linear_history_is_one_straight_column() {
    let result = layout_fixture("linear.log", &GridConfig::default());
    let layout = &result.layout;
    assert_eq!(layout.total_columns(), 1);
    assert_eq!(layout.nodes(), vec![(0, 0), (1, 0), (2, 0)]);
    for row in 0..3 {
        assert!(layout.get(row, 0).is_vertical_line);
    }
    assert!(!layout.get(0, 0).is_top_break_point);
    assert!(!layout.get(2, 0).is_bottom_break_point);
}

#[test]
fn merge_connects_both_parent_columns() {
    let result = layout_fixture("merge.log", &GridConfig::default());
    let layout = &result.layout;
    let merge = result.input.positions["e5f6a7b"];
    let feature = result.input.positions["9a8b7c6"];
    assert_eq!(merge.column, 0);
    assert_eq!(feature.column, 1);
    assert!(layout.get(merge.row, merge.column).is_node);
    assert!(layout.get(merge.row, feature.column).is_horizontal_line);
    assert!(layout.get(merge.row, feature.column).is_left_down_curve);
    // the feature branch forks off on the row of the shared parent
    let fork = result.input.positions["b2c3d4e"];
    assert!(layout.get(fork.row, feature.column).is_horizontal_line);
    assert!(layout.get(fork.row, feature.column).is_left_up_curve);
}

#[test]
fn index_with_head_outside_window_breaks_downwards() {
    let grid = GridConfig {
        show_index: true,
        page_start: 0,
        page_size: Some(1),
        ..GridConfig::default()
    };
    let result = layout_fixture("linear.log", &grid);
    let index = result.layout.get(0, 0);
    assert!(index.is_node && index.is_index);
    assert!(index.is_bottom_break_point);
    assert_eq!(result.layout.rows.len(), 1);
}

#[test]
fn index_connects_to_visible_head() {
    let grid = GridConfig {
        show_index: true,
        ..GridConfig::default()
    };
    let result = layout_fixture("merge.log", &grid);
    let index = result.layout.get(0, 0);
    assert!(index.is_index && index.is_vertical_line);
    assert!(!index.is_bottom_break_point);
    assert_eq!(result.input.positions["e5f6a7b"].row, 1);
}

#[test]
fn window_slice_marks_break_points() {
    let grid = GridConfig {
        page_start: 1,
        page_size: Some(1),
        ..GridConfig::default()
    };
    let result = layout_fixture("linear.log", &grid);
    let cell = result.layout.get(1, 0);
    assert!(cell.is_node);
    assert!(cell.is_top_break_point && cell.is_bottom_break_point);
    assert!(cell.is_first_row && cell.is_last_row);
}

#[test]
fn server_page_routes_missing_parents_through_virtual_columns() {
    let grid = GridConfig {
        pagination: Pagination::Server,
        ..GridConfig::default()
    };
    let result = layout_fixture("page.log", &grid);
    let layout = &result.layout;
    assert_eq!(layout.graph_width, 1);
    assert_eq!(layout.virtual_columns, 2);
    assert!(layout.get(0, 1).is_left_down_curve);
    assert!(layout.get(2, 1).is_bottom_break_point);
    assert!(layout.get(2, 2).is_left_down_curve);
    assert!(layout.get(2, 2).is_bottom_break_point);

    let client = layout_fixture("page.log", &GridConfig::default());
    assert_eq!(client.layout.virtual_columns, 0);
}

#[test]
fn query_returns_identical_grid_for_same_input() {
    let result = layout_fixture("merge.log", &GridConfig::default());
    let mut query = LayoutQuery::new();
    let first = query.columns(&result.input).unwrap().clone();
    assert_eq!(&first, query.columns(&result.input).unwrap());
    assert_eq!(first, result.layout);
    assert_eq!(query.rebuilds(), 1);
}
