//! Search results and statistics

use super::SearchMode;
use crate::core::Move;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// A winning position was found
    Solved,
    /// Every reachable position was explored without a win
    Exhausted,
    /// The expansion budget ran out
    StateBudget,
    /// The unique-state cap was reached
    MemoryBudget,
    /// The wall-clock budget ran out
    Timeout,
    /// The caller cancelled the search
    Cancelled,
}

impl Termination {
    /// A budget ran out before the answer was known
    ///
    /// This means "unknown", not "unsolvable".
    #[inline]
    #[must_use]
    pub const fn is_budget(self) -> bool {
        matches!(self, Self::StateBudget | Self::MemoryBudget | Self::Timeout)
    }

    /// The outcome is authoritative (proven solvable or proven unsolvable)
    #[inline]
    #[must_use]
    pub const fn is_conclusive(self) -> bool {
        matches!(self, Self::Solved | Self::Exhausted)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Solved => "solved",
            Self::Exhausted => "exhausted",
            Self::StateBudget => "state budget reached",
            Self::MemoryBudget => "memory budget reached",
            Self::Timeout => "timed out",
            Self::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Branching factor statistics over all expanded nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchingStats {
    pub max: usize,
    pub avg: f64,
    /// Branching factor of every expanded node, in expansion order
    pub factors: Vec<usize>,
}

impl BranchingStats {
    pub(crate) fn record(&mut self, factor: usize) {
        self.max = self.max.max(factor);
        self.factors.push(factor);
    }

    pub(crate) fn finish(&mut self) {
        if self.factors.is_empty() {
            self.avg = 0.0;
        } else {
            let total: usize = self.factors.iter().sum();
            self.avg = total as f64 / self.factors.len() as f64;
        }
    }
}

/// Outcome of one search invocation
#[derive(Debug, Clone, Serialize)]
pub struct SolverResult {
    pub mode: SearchMode,
    pub solvable: bool,
    /// Length of the optimal path, when solved
    pub optimal_moves: Option<usize>,
    pub path: Vec<Move>,
    /// Number of node expansions
    pub states_explored: usize,
    /// Number of distinct positions discovered
    pub unique_states: usize,
    /// Largest path cost of any discovered position
    pub max_depth: usize,
    pub dead_ends: usize,
    pub decision_points: usize,
    pub branching: BranchingStats,
    pub elapsed: Duration,
    /// A budget ran out before the search could conclude
    pub timed_out: bool,
    pub termination: Termination,
    pub initial_piece_count: usize,
    /// Piece count of the winning position, when solved
    pub final_piece_count: Option<usize>,
}

impl SolverResult {
    /// Elapsed time in milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Number of moves in the path that triggered at least one merge
    #[must_use]
    pub fn merging_moves(&self) -> usize {
        self.path.iter().filter(|m| m.merged()).count()
    }

    /// Longest chain reaction along the path
    #[must_use]
    pub fn longest_chain(&self) -> usize {
        self.path.iter().map(|m| m.chain_length).max().unwrap_or(0)
    }
}
