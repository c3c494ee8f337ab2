//! Time-sliced solving
//!
//! `ChunkedSolve` drives a [`Search`] a fixed number of expansions at a time
//! so the host can stay responsive between slices. The question it answers
//! is "how few pieces can this puzzle be reduced to", so the search target
//! is the theoretical minimum rather than the level's own target.

use super::{CancelToken, LiveConfig};
use crate::core::Puzzle;
use crate::solver::{Search, SolveOptions, Termination};

/// Final answer of a chunked solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOutcome {
    /// The theoretical minimum is reachable
    Solved {
        final_pieces: usize,
        optimal_moves: usize,
    },
    /// Every reachable position was seen; `min_pieces` is exact
    Exhausted { min_pieces: usize },
    /// Budget ran out; `best_pieces` is the best seen so far
    BudgetReached { best_pieces: usize },
    Cancelled,
}

impl LiveOutcome {
    /// Best piece count found, or `None` if the solve was cancelled
    #[must_use]
    pub const fn min_pieces(self) -> Option<usize> {
        match self {
            Self::Solved { final_pieces, .. } => Some(final_pieces),
            Self::Exhausted { min_pieces } => Some(min_pieces),
            Self::BudgetReached { best_pieces } => Some(best_pieces),
            Self::Cancelled => None,
        }
    }

    /// Whether `min_pieces` is proven to be the true minimum
    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Solved { .. } | Self::Exhausted { .. })
    }
}

/// Result of running one slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkStatus {
    /// More work remains; carries the fraction of the budget used
    Pending(f64),
    Done(LiveOutcome),
}

/// A search that runs in fixed-size slices and honours a cancel token
#[derive(Debug)]
pub struct ChunkedSolve {
    search: Search,
    token: CancelToken,
    chunk_size: usize,
}

impl ChunkedSolve {
    #[must_use]
    pub fn new(puzzle: &Puzzle, config: &LiveConfig, token: CancelToken) -> Self {
        let options = SolveOptions::for_mode(config.mode)
            .with_max_states(config.max_states)
            .with_timeout(None);
        let target = puzzle.theoretical_min_pieces();
        Self {
            search: Search::new(puzzle.clone().with_target(target), options),
            token,
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Run one slice of at most `chunk_size` expansions
    ///
    /// The token is checked before any work is done.
    pub fn run_chunk(&mut self) -> ChunkStatus {
        if self.token.is_cancelled() {
            self.search.cancel();
        }

        match self.search.step(self.chunk_size) {
            None => ChunkStatus::Pending(self.search.progress()),
            Some(termination) => ChunkStatus::Done(self.outcome(termination)),
        }
    }

    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.search.progress()
    }

    #[inline]
    #[must_use]
    pub const fn explored(&self) -> usize {
        self.search.explored()
    }

    #[inline]
    #[must_use]
    pub const fn token(&self) -> &CancelToken {
        &self.token
    }

    fn outcome(&self, termination: Termination) -> LiveOutcome {
        let best = self.search.best_piece_count();
        match termination {
            Termination::Solved => LiveOutcome::Solved {
                final_pieces: best,
                optimal_moves: self.search.solution_length().unwrap_or(0),
            },
            Termination::Exhausted => LiveOutcome::Exhausted { min_pieces: best },
            Termination::StateBudget | Termination::MemoryBudget | Termination::Timeout => {
                LiveOutcome::BudgetReached { best_pieces: best }
            }
            Termination::Cancelled => LiveOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(text: &str) -> Puzzle {
        text.parse().unwrap()
    }

    fn run_to_end(job: &mut ChunkedSolve) -> LiveOutcome {
        loop {
            if let ChunkStatus::Done(outcome) = job.run_chunk() {
                return outcome;
            }
        }
    }

    #[test]
    fn reaches_theoretical_minimum() {
        // Level target is 4 but everything can merge into one 16
        let p = puzzle("4 | 4:8,4,2 4:2 4:");
        let mut job = ChunkedSolve::new(&p, &LiveConfig::default(), CancelToken::new());
        let outcome = run_to_end(&mut job);
        assert_eq!(
            outcome,
            LiveOutcome::Solved {
                final_pieces: 1,
                optimal_moves: 1
            }
        );
        assert!(outcome.is_exact());
    }

    #[test]
    fn exhaustion_gives_exact_minimum() {
        // Both tubes are full, so nothing can move
        let p = puzzle("1 | 2:2,4 2:4,2");
        let mut job = ChunkedSolve::new(&p, &LiveConfig::default(), CancelToken::new());
        let outcome = run_to_end(&mut job);
        assert_eq!(outcome, LiveOutcome::Exhausted { min_pieces: 4 });
        assert_eq!(outcome.min_pieces(), Some(4));
    }

    #[test]
    fn cancelled_before_first_chunk() {
        let token = CancelToken::new();
        let mut job = ChunkedSolve::new(&puzzle("1 | 4:2,4 4:4,2 4:"), &LiveConfig::default(), token.clone());
        token.cancel();
        assert_eq!(job.run_chunk(), ChunkStatus::Done(LiveOutcome::Cancelled));
        assert_eq!(LiveOutcome::Cancelled.min_pieces(), None);
        assert_eq!(job.explored(), 0);
    }

    #[test]
    fn small_chunks_report_progress() {
        let config = LiveConfig::default().with_chunk_size(1).with_max_states(1_000);
        let mut job = ChunkedSolve::new(&puzzle("1 | 4:2,4 4:4,2 4: 4:8"), &config, CancelToken::new());
        match job.run_chunk() {
            ChunkStatus::Pending(progress) => {
                assert!(progress > 0.0 && progress <= 1.0);
                assert_eq!(job.explored(), 1);
            }
            ChunkStatus::Done(outcome) => panic!("finished after one expansion: {outcome:?}"),
        }
    }

    #[test]
    fn budget_gives_best_effort() {
        let config = LiveConfig::default().with_max_states(1);
        let mut job = ChunkedSolve::new(&puzzle("1 | 4:2,4 4:4,2 4: 4:8"), &config, CancelToken::new());
        let outcome = run_to_end(&mut job);
        assert!(matches!(outcome, LiveOutcome::BudgetReached { .. }));
        assert!(!outcome.is_exact());
        assert!(outcome.min_pieces().is_some());
    }
}
