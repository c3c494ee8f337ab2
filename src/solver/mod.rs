//! Puzzle solving algorithms
//!
//! BFS and A* over the move graph, the A* heuristic, and the path verifier.

mod engine;
pub mod heuristic;
mod result;
pub mod strategy;
mod verify;

pub use engine::{
    DEFAULT_ASTAR_MAX_STATES, DEFAULT_BFS_MAX_STATES, DEFAULT_TIMEOUT, Search, SolveOptions, solve,
};
pub use result::{BranchingStats, SolverResult, Termination};
pub use strategy::{Frontier, FrontierKind, SearchMode};
pub use verify::{Verified, VerifyError, verify, verify_relaxed};
