//! Live solving for interactive use
//!
//! Wraps the search engine so a UI can ask "how few pieces can this puzzle
//! reach" without blocking: debounced requests, fixed-size slices,
//! cooperative cancellation and a staleness guard on published results.

mod chunked;
mod session;
mod token;
mod worker;

pub use chunked::{ChunkStatus, ChunkedSolve, LiveOutcome};
pub use session::{LiveAnswer, LiveEvent, LiveSolver};
pub use token::CancelToken;
pub use worker::{SolveHandle, solve_async};

use crate::solver::SearchMode;
use std::time::Duration;

/// Tuning for live solving
///
/// None of these affect correctness, only responsiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveConfig {
    /// Quiet period after the last change before work starts
    pub debounce: Duration,
    /// Expansions per slice
    pub chunk_size: usize,
    /// Expansion budget per computation
    pub max_states: usize,
    pub mode: SearchMode,
}

impl LiveConfig {
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub const fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            chunk_size: 500,
            max_states: 50_000,
            mode: SearchMode::AStar,
        }
    }
}
