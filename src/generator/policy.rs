//! Candidate acceptance
//!
//! Solves a candidate with the group's budgets, replays the solution with the
//! order-tolerant verifier and checks the move and fill windows. A candidate
//! whose search ran out of budget is a retry, not a proof of anything.

use super::GroupConfig;
use crate::core::Puzzle;
use crate::solver::{
    SearchMode, SolveOptions, SolverResult, Termination, VerifyError, solve, verify_relaxed,
};
use std::fmt;

/// Slack below the group's minimum fill ratio
const FILL_SLACK: f64 = 0.05;

/// Why a candidate was turned down
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The search proved there is no solution
    Unsolvable,
    /// A budget ran out before the search concluded
    Unresolved(Termination),
    Verification(VerifyError),
    TooFewMoves { moves: usize, min: usize },
    TooManyMoves { moves: usize, max: usize },
    FillTooLow { fill: f64, min: f64 },
}

impl Rejection {
    /// Short label for tallies
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unsolvable => "unsolvable",
            Self::Unresolved(_) => "unresolved",
            Self::Verification(_) => "verification",
            Self::TooFewMoves { .. } => "too few moves",
            Self::TooManyMoves { .. } => "too many moves",
            Self::FillTooLow { .. } => "fill too low",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsolvable => write!(f, "unsolvable"),
            Self::Unresolved(t) => write!(f, "unresolved ({t})"),
            Self::Verification(e) => write!(f, "verification failed: {e}"),
            Self::TooFewMoves { moves, min } => write!(f, "moves too low: {moves}, need >= {min}"),
            Self::TooManyMoves { moves, max } => {
                write!(f, "moves too high: {moves}, need <= {max}")
            }
            Self::FillTooLow { fill, min } => {
                write!(f, "fill too low: {:.0}%, need >= {:.0}%", fill * 100.0, min * 100.0)
            }
        }
    }
}

/// An accepted candidate
#[derive(Debug, Clone)]
pub struct Accepted {
    /// The candidate with its target tightened to the achieved piece count
    pub puzzle: Puzzle,
    pub result: SolverResult,
    pub optimal_moves: usize,
    pub fill_ratio: f64,
}

impl Accepted {
    /// Share of expanded positions that had no successors
    #[must_use]
    pub fn dead_end_ratio(&self) -> f64 {
        if self.result.states_explored == 0 {
            0.0
        } else {
            self.result.dead_ends as f64 / self.result.states_explored as f64
        }
    }
}

/// Solve options a group asks for
#[must_use]
pub const fn solve_options(group: &GroupConfig) -> SolveOptions {
    SolveOptions::for_mode(SearchMode::AStar)
        .with_max_states(group.solver_max_states)
        .with_timeout(Some(group.solver_timeout()))
}

/// Solve and judge one candidate against `group`
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies.
pub fn evaluate(puzzle: &Puzzle, group: &GroupConfig) -> Result<Accepted, Rejection> {
    let result = solve(puzzle, &solve_options(group));

    if !result.solvable {
        return Err(if result.termination == Termination::Exhausted {
            Rejection::Unsolvable
        } else {
            Rejection::Unresolved(result.termination)
        });
    }

    let verified = verify_relaxed(puzzle, &result.path).map_err(Rejection::Verification)?;
    let moves = verified.moves;

    if moves < group.move_range.0 {
        return Err(Rejection::TooFewMoves {
            moves,
            min: group.move_range.0,
        });
    }
    if moves > group.move_range.1 {
        return Err(Rejection::TooManyMoves {
            moves,
            max: group.move_range.1,
        });
    }

    let fill = puzzle.fill_ratio();
    let min_fill = group.fill_range.0 - FILL_SLACK;
    if fill < min_fill {
        return Err(Rejection::FillTooLow {
            fill,
            min: min_fill,
        });
    }

    Ok(Accepted {
        puzzle: puzzle.clone().with_target(verified.final_piece_count),
        result,
        optimal_moves: moves,
        fill_ratio: fill,
    })
}
