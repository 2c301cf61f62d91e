use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ir::{Edge, History, Position};
use crate::layout::{LayoutInput, Pagination, RowWindow};

/// How a parsed history becomes a [`LayoutInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    pub show_index: bool,
    pub pagination: Pagination,
    /// Visible rows; every row when unset.
    pub window: Option<RowWindow>,
    /// Defaults to the newest loaded commit.
    pub head_commit: Option<String>,
}

/// Lane assignment for a history, newest commit on the top row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedGraph {
    pub positions: HashMap<String, Position>,
    pub edges: Vec<Edge>,
    pub graph_width: usize,
    pub rows: usize,
}

#[derive(Debug, Default)]
struct LaneAssigner {
    // Parent hash each lane is waiting for.
    lanes: Vec<Option<String>>,
    parent_to_lanes: HashMap<String, Vec<usize>>,
    max_lanes: usize,
}

impl LaneAssigner {
    fn first_empty_lane_idx(&mut self) -> usize {
        self.lanes.iter().position(Option::is_none).unwrap_or_else(|| {
            self.lanes.push(None);
            self.lanes.len() - 1
        })
    }

    fn await_parent(&mut self, lane: usize, parent: &str) {
        self.lanes[lane] = Some(parent.to_string());
        let lanes = self.parent_to_lanes.entry(parent.to_string()).or_default();
        if !lanes.contains(&lane) {
            lanes.push(lane);
            lanes.sort_unstable();
        }
    }

    /// Takes the lowest lane waiting for `hash` and frees every other one.
    fn arrive(&mut self, hash: &str) -> usize {
        match self.parent_to_lanes.remove(hash) {
            Some(lanes) => {
                for lane in &lanes {
                    self.lanes[*lane] = None;
                }
                lanes[0]
            }
            None => self.first_empty_lane_idx(),
        }
    }
}

/// Assigns every commit of `history` a lane. `first_row` shifts all rows
/// down, e.g. to keep row 0 free for the index pseudo-commit.
///
/// Parents outside the history get no lane; edges to them are only kept when
/// `keep_dangling_edges` is set.
pub fn resolve(history: &History, first_row: usize, keep_dangling_edges: bool) -> ResolvedGraph {
    let mut assigner = LaneAssigner::default();
    let mut resolved = ResolvedGraph::default();

    for commit in &history.commits {
        // repeated hashes keep their first row
        if resolved.positions.contains_key(&commit.hash) {
            continue;
        }
        let row = first_row + resolved.positions.len();
        let lane = assigner.arrive(&commit.hash);
        resolved
            .positions
            .insert(commit.hash.clone(), Position::new(row, lane));

        for (parent_idx, parent) in commit.parents.iter().enumerate() {
            let loaded = history.contains(parent);
            if loaded || keep_dangling_edges {
                resolved.edges.push(if parent_idx == 0 {
                    Edge::new(&commit.hash, parent)
                } else {
                    Edge::merge(&commit.hash, parent)
                });
            }
            if !loaded || resolved.positions.contains_key(parent) {
                continue;
            }
            if parent_idx == 0 {
                assigner.await_parent(lane, parent);
            } else if !assigner.parent_to_lanes.contains_key(parent) {
                let new_lane = assigner.first_empty_lane_idx();
                assigner.await_parent(new_lane, parent);
            }
        }

        assigner.max_lanes = assigner.max_lanes.max(assigner.lanes.len());
        while matches!(assigner.lanes.last(), Some(None)) {
            assigner.lanes.pop();
        }
    }

    resolved.graph_width = assigner.max_lanes;
    resolved.rows = first_row + resolved.positions.len();
    tracing::debug!(
        commits = history.len(),
        edges = resolved.edges.len(),
        graph_width = resolved.graph_width,
        "resolved lanes"
    );
    resolved
}

/// Lanes, edges and window for `history` in one [`LayoutInput`].
pub fn resolve_layout_input(history: &History, options: &ResolveOptions) -> LayoutInput {
    let first_row = usize::from(options.show_index);
    let keep_dangling_edges = options.pagination == Pagination::Server;
    let resolved = resolve(history, first_row, keep_dangling_edges);
    let head_commit_hash = options
        .head_commit
        .clone()
        .or_else(|| history.head().map(|commit| commit.hash.clone()));

    LayoutInput {
        commits: history.commits.clone(),
        positions: resolved.positions,
        edges: resolved.edges,
        graph_width: resolved.graph_width,
        head_commit_hash,
        window: options
            .window
            .unwrap_or_else(|| RowWindow::new(0, resolved.rows)),
        pagination: options.pagination,
        show_index: options.show_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Commit, EdgeKind};

    fn history(commits: &[(&str, &[&str])]) -> History {
        History::new(
            commits
                .iter()
                .map(|(hash, parents)| Commit::new(hash, parents, "main"))
                .collect(),
        )
    }

    fn column(resolved: &ResolvedGraph, hash: &str) -> usize {
        resolved.positions[hash].column
    }

    #[test]
    fn linear_history_uses_one_lane() {
        let resolved = resolve(&history(&[("c", &["b"]), ("b", &["a"]), ("a", &[])]), 0, false);
        assert_eq!(resolved.graph_width, 1);
        assert_eq!(resolved.positions["a"], Position::new(2, 0));
        assert!(resolved.edges.iter().all(|edge| edge.kind == EdgeKind::Normal));
    }

    #[test]
    fn merge_opens_a_lane_that_closes_at_the_fork() {
        let resolved = resolve(
            &history(&[
                ("m", &["b", "f"]),
                ("f", &["a"]),
                ("b", &["a"]),
                ("a", &[]),
                ("root", &[]),
            ]),
            0,
            false,
        );
        assert_eq!(column(&resolved, "m"), 0);
        assert_eq!(column(&resolved, "f"), 1);
        assert_eq!(column(&resolved, "b"), 0);
        assert_eq!(column(&resolved, "a"), 0);
        assert_eq!(column(&resolved, "root"), 0);
        assert_eq!(resolved.graph_width, 2);
        assert_eq!(
            resolved.edges,
            vec![
                Edge::new("m", "b"),
                Edge::merge("m", "f"),
                Edge::new("f", "a"),
                Edge::new("b", "a"),
            ]
        );
    }

    #[test]
    fn new_branch_tip_reuses_a_freed_lane() {
        let resolved = resolve(
            &history(&[("x", &["b"]), ("y", &["z"]), ("z", &[]), ("b", &[])]),
            0,
            false,
        );
        assert_eq!(column(&resolved, "x"), 0);
        assert_eq!(column(&resolved, "y"), 1);
        assert_eq!(column(&resolved, "z"), 1);
        assert_eq!(column(&resolved, "b"), 0);
        assert_eq!(resolved.graph_width, 2);
    }

    #[test]
    fn dangling_parents_only_kept_on_request() {
        let log = history(&[("b", &["a"]), ("a", &["gone"])]);
        assert_eq!(resolve(&log, 0, false).edges, vec![Edge::new("b", "a")]);
        let resolved = resolve(&log, 0, true);
        assert_eq!(resolved.edges.len(), 2);
        assert_eq!(resolved.graph_width, 1);
    }

    #[test]
    fn layout_input_reserves_the_index_row() {
        let options = ResolveOptions {
            show_index: true,
            ..ResolveOptions::default()
        };
        let input = resolve_layout_input(&history(&[("b", &["a"]), ("a", &[])]), &options);
        assert_eq!(input.positions["b"], Position::new(1, 0));
        assert_eq!(input.window, RowWindow::new(0, 3));
        assert_eq!(input.head_commit_hash.as_deref(), Some("b"));
        assert!(crate::layout::compute_layout(&input).is_ok());
    }

    #[test]
    fn repeated_hash_is_positioned_once() {
        let resolved = resolve(&history(&[("b", &["a"]), ("b", &["a"]), ("a", &[])]), 0, false);
        assert_eq!(resolved.positions.len(), 2);
        assert_eq!(resolved.positions["a"], Position::new(1, 0));
        assert_eq!(resolved.rows, 2);
    }

    #[test]
    fn empty_history_resolves_to_nothing() {
        let input = resolve_layout_input(&History::default(), &ResolveOptions::default());
        assert_eq!(input.graph_width, 0);
        assert!(input.window.is_empty());
        assert!(crate::layout::compute_layout(&input).unwrap().is_empty());
    }
}
