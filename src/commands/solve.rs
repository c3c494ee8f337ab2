//! Puzzle solving command
//!
//! Solves one puzzle, verifies the returned path and keeps every
//! intermediate position so the solution can be replayed on screen.

use crate::core::Puzzle;
use crate::solver::{SolveOptions, SolverResult, Verified, VerifyError, solve, verify};

/// Result of solving a puzzle
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub label: String,
    pub puzzle: Puzzle,
    pub result: SolverResult,
    /// Strict replay of the returned path (empty path when unsolved)
    pub verification: Result<Verified, VerifyError>,
    /// Position after each move of the path
    pub positions: Vec<Puzzle>,
}

impl SolveReport {
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verification.is_ok()
    }
}

/// Solve a puzzle with the given options
#[must_use]
pub fn solve_puzzle(label: &str, puzzle: &Puzzle, options: &SolveOptions) -> SolveReport {
    let result = solve(puzzle, options);
    let verification = if result.solvable {
        verify(puzzle, &result.path)
    } else {
        Err(VerifyError::TargetMissed {
            actual: puzzle.piece_count(),
            target: puzzle.target_piece_count(),
        })
    };

    let mut positions = Vec::with_capacity(result.path.len());
    let mut current = puzzle.clone();
    for mv in &result.path {
        match current.apply_move(mv.from, mv.to) {
            Some((next, _)) => {
                positions.push(next.clone());
                current = next;
            }
            None => break,
        }
    }

    SolveReport {
        label: label.to_string(),
        puzzle: puzzle.clone(),
        result,
        verification,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SearchMode;

    #[test]
    fn solves_and_replays() {
        let puzzle: Puzzle = "3 | 4:2,4,8 4:8,4,2 4:".parse().unwrap();
        let report = solve_puzzle("test", &puzzle, &SolveOptions::default());

        assert!(report.result.solvable);
        assert!(report.verified());
        assert_eq!(report.positions.len(), 3);
        assert!(report.positions.last().unwrap().is_won());
    }

    #[test]
    fn unsolvable_is_not_verified() {
        let puzzle: Puzzle = "1 | 2:2 2:4".parse().unwrap();
        let report = solve_puzzle("stuck", &puzzle, &SolveOptions::for_mode(SearchMode::Bfs));

        assert!(!report.result.solvable);
        assert!(!report.verified());
        assert!(report.positions.is_empty());
    }

    #[test]
    fn already_won_has_no_positions() {
        let puzzle: Puzzle = "2 | 3:2 3:4".parse().unwrap();
        let report = solve_puzzle("won", &puzzle, &SolveOptions::default());

        assert_eq!(report.result.optimal_moves, Some(0));
        assert!(report.verified());
        assert!(report.positions.is_empty());
    }
}
