use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::parser::LogEntry;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub parents: Vec<String>,
    /// Hashes of the loaded commits that list this one as a parent.
    pub children: Vec<String>,
    pub branch: String,
    pub message: String,
    pub committer_date: String,
    pub author_date: String,
    pub author: Option<Author>,
    /// No other commit of `branch` is closer to the head.
    pub is_branch_tip: bool,
}

impl Commit {
    pub fn new(hash: &str, parents: &[&str], branch: &str) -> Self {
        Self {
            hash: hash.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            children: Vec::new(),
            branch: branch.to_string(),
            message: String::new(),
            committer_date: String::new(),
            author_date: String::new(),
            author: None,
            is_branch_tip: false,
        }
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Grid placement of a commit. Rows grow downwards, away from the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// First-parent continuation, or a branch forking off its parent.
    Normal,
    /// From a merge commit to a parent it merged in.
    Merge,
}

/// Ancestry link between two commits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Child commit hash (upper row).
    pub from: String,
    /// Parent commit hash (lower row).
    pub to: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind: EdgeKind::Normal,
        }
    }

    pub fn merge(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            kind: EdgeKind::Merge,
        }
    }
}

/// Commits in log order, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub commits: Vec<Commit>,
    index: HashMap<String, usize>,
}

impl History {
    pub fn new(commits: Vec<Commit>) -> Self {
        let mut history = Self {
            commits,
            index: HashMap::new(),
        };
        history.link();
        history
    }

    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let commits = entries
            .into_iter()
            .map(|entry| Commit {
                hash: entry.hash,
                parents: entry.parents,
                children: Vec::new(),
                branch: entry.branch,
                message: entry.message,
                committer_date: entry.committer_date,
                author_date: entry.author_date,
                author: entry.author,
                is_branch_tip: false,
            })
            .collect();
        Self::new(commits)
    }

    pub fn get(&self, hash: &str) -> Option<&Commit> {
        self.index.get(hash).map(|idx| &self.commits[*idx])
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// The newest commit, which log output lists first.
    pub fn head(&self) -> Option<&Commit> {
        self.commits.first()
    }

    // Rebuilds the hash index and the derived fields (children, branch tips).
    fn link(&mut self) {
        self.index.clear();
        for (idx, commit) in self.commits.iter().enumerate() {
            self.index.entry(commit.hash.clone()).or_insert(idx);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for commit in &self.commits {
            for parent in &commit.parents {
                if self.index.contains_key(parent) {
                    children
                        .entry(parent.clone())
                        .or_default()
                        .push(commit.hash.clone());
                }
            }
        }

        let mut seen_branches: HashSet<String> = HashSet::new();
        for commit in &mut self.commits {
            commit.children = children.remove(&commit.hash).unwrap_or_default();
            commit.is_branch_tip = seen_branches.insert(commit.branch.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_children_and_branch_tips() {
        let history = History::new(vec![
            Commit::new("c3", &["c2", "f1"], "main"),
            Commit::new("f1", &["c1"], "feature"),
            Commit::new("c2", &["c1"], "main"),
            Commit::new("c1", &[], "main"),
        ]);

        let c1 = history.get("c1").unwrap();
        assert_eq!(c1.children, vec!["f1".to_string(), "c2".to_string()]);
        assert!(!c1.is_branch_tip);
        assert!(history.get("c3").unwrap().is_branch_tip);
        assert!(history.get("f1").unwrap().is_branch_tip);
        assert!(!history.get("c2").unwrap().is_branch_tip);
        assert!(history.get("c3").unwrap().is_merge());
        assert!(c1.is_root());
    }

    #[test]
    fn ignores_parents_outside_the_loaded_history() {
        let history = History::new(vec![Commit::new("b", &["a"], "main")]);
        assert!(history.get("b").unwrap().children.is_empty());
        assert!(!history.contains("a"));
        assert_eq!(history.head().map(|c| c.hash.as_str()), Some("b"));
    }
}
