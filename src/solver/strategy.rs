//! Search strategies
//!
//! Defines the `Frontier` trait, the two concrete frontiers (FIFO for BFS,
//! priority queue for A*) and the `SearchMode` that picks between them.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

/// Which search algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SearchMode {
    /// Breadth-first search, ground truth
    Bfs,
    /// A* with the piece-count heuristic (default)
    #[default]
    AStar,
}

impl SearchMode {
    /// Parse a mode name
    ///
    /// Supported names: "bfs", "astar", "a*", "a-star"
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bfs" => Some(Self::Bfs),
            "astar" | "a*" | "a-star" => Some(Self::AStar),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::AStar => "A*",
        }
    }

    /// Whether nodes are ordered by `g + h` and may be reopened
    #[inline]
    #[must_use]
    pub const fn uses_heuristic(self) -> bool {
        matches!(self, Self::AStar)
    }

    /// Create the matching empty frontier
    #[must_use]
    pub fn frontier(self) -> FrontierKind {
        match self {
            Self::Bfs => FrontierKind::Fifo(FifoFrontier::default()),
            Self::AStar => FrontierKind::Priority(PriorityFrontier::default()),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A queued reference to a search node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Index into the search arena
    pub node: usize,
    /// Path cost when queued
    pub g: usize,
    /// `g + h` when queued (equal to `g` for BFS)
    pub f: usize,
    seq: u64,
}

impl FrontierEntry {
    #[must_use]
    pub const fn new(node: usize, g: usize, f: usize, seq: u64) -> Self {
        Self { node, g, f, seq }
    }
}

impl Ord for FrontierEntry {
    // BinaryHeap is a max-heap: the "greatest" entry is the one to expand
    // next. Lowest f first, then deepest g, then oldest insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open list of nodes waiting to be expanded
pub trait Frontier {
    fn push(&mut self, entry: FrontierEntry);

    /// Remove the next entry to expand
    fn pop(&mut self) -> Option<FrontierEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discovery-ordered queue
#[derive(Debug, Default)]
pub struct FifoFrontier(VecDeque<FrontierEntry>);

impl Frontier for FifoFrontier {
    fn push(&mut self, entry: FrontierEntry) {
        self.0.push_back(entry);
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Min-`f` priority queue
#[derive(Debug, Default)]
pub struct PriorityFrontier(BinaryHeap<FrontierEntry>);

impl Frontier for PriorityFrontier {
    fn push(&mut self, entry: FrontierEntry) {
        self.0.push(entry);
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Enum wrapper over the frontier types
///
/// Allows runtime selection of the search mode while keeping static dispatch.
#[derive(Debug)]
pub enum FrontierKind {
    Fifo(FifoFrontier),
    Priority(PriorityFrontier),
}

impl Frontier for FrontierKind {
    fn push(&mut self, entry: FrontierEntry) {
        match self {
            Self::Fifo(f) => f.push(entry),
            Self::Priority(f) => f.push(entry),
        }
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        match self {
            Self::Fifo(f) => f.pop(),
            Self::Priority(f) => f.pop(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Fifo(f) => f.len(),
            Self::Priority(f) => f.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_name() {
        assert_eq!(SearchMode::from_name("bfs"), Some(SearchMode::Bfs));
        assert_eq!(SearchMode::from_name("BFS"), Some(SearchMode::Bfs));
        assert_eq!(SearchMode::from_name("astar"), Some(SearchMode::AStar));
        assert_eq!(SearchMode::from_name("a*"), Some(SearchMode::AStar));
        assert_eq!(SearchMode::from_name("dfs"), None);
        assert_eq!(SearchMode::default(), SearchMode::AStar);
    }

    #[test]
    fn fifo_keeps_discovery_order() {
        let mut frontier = SearchMode::Bfs.frontier();
        frontier.push(FrontierEntry::new(0, 0, 9, 0));
        frontier.push(FrontierEntry::new(1, 1, 1, 1));
        frontier.push(FrontierEntry::new(2, 1, 5, 2));

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop()).map(|e| e.node).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn priority_pops_lowest_f_then_deepest() {
        let mut frontier = SearchMode::AStar.frontier();
        frontier.push(FrontierEntry::new(0, 1, 5, 0));
        frontier.push(FrontierEntry::new(1, 1, 3, 1));
        frontier.push(FrontierEntry::new(2, 2, 3, 2));
        frontier.push(FrontierEntry::new(3, 2, 3, 3));
        assert_eq!(frontier.len(), 4);

        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop()).map(|e| e.node).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
        assert!(frontier.is_empty());
    }
}
