//! BFS vs A* comparison
//!
//! Solves each level with both modes and checks they agree on the optimal
//! move count. Levels are compared in parallel; each individual search stays
//! single-threaded.

use super::progress_bar;
use super::source::NamedLevel;
use crate::solver::{SearchMode, SolveOptions, SolverResult, solve, verify};
use anyhow::Result;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Both results for one level
#[derive(Debug, Clone)]
pub struct Comparison {
    pub label: String,
    pub bfs: SolverResult,
    pub astar: SolverResult,
    /// The A* path passed strict verification
    pub astar_verified: bool,
}

impl Comparison {
    /// Both searches concluded
    #[must_use]
    pub const fn conclusive(&self) -> bool {
        self.bfs.termination.is_conclusive() && self.astar.termination.is_conclusive()
    }

    /// Both modes agree on solvability and optimal move count
    #[must_use]
    pub fn moves_match(&self) -> bool {
        self.bfs.solvable == self.astar.solvable && self.bfs.optimal_moves == self.astar.optimal_moves
    }

    /// BFS expansions per A* expansion
    #[must_use]
    pub fn speedup(&self) -> f64 {
        self.bfs.states_explored as f64 / self.astar.states_explored.max(1) as f64
    }
}

/// Comparison over a set of levels
#[derive(Debug, Clone)]
pub struct ComparisonSummary {
    pub rows: Vec<Comparison>,
    pub elapsed: Duration,
}

impl ComparisonSummary {
    /// Levels where both searches concluded and agreed
    #[must_use]
    pub fn matches(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.conclusive() && r.moves_match())
            .count()
    }

    /// Levels where both searches concluded and disagreed
    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.conclusive() && !r.moves_match())
            .count()
    }

    /// Levels where at least one search ran out of budget
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.rows.iter().filter(|r| !r.conclusive()).count()
    }

    #[must_use]
    pub fn total_bfs_states(&self) -> usize {
        self.rows.iter().map(|r| r.bfs.states_explored).sum()
    }

    #[must_use]
    pub fn total_astar_states(&self) -> usize {
        self.rows.iter().map(|r| r.astar.states_explored).sum()
    }

    /// Overall expansion ratio
    #[must_use]
    pub fn speedup(&self) -> f64 {
        self.total_bfs_states() as f64 / self.total_astar_states().max(1) as f64
    }
}

/// Compare one level
///
/// `options` supplies the budget; the mode is overridden per run.
///
/// # Errors
///
/// Returns an error if the level is malformed.
pub fn compare_level(level: &NamedLevel, options: &SolveOptions) -> Result<Comparison> {
    let puzzle = level.puzzle()?;
    let bfs = solve(&puzzle, &SolveOptions { mode: SearchMode::Bfs, ..*options });
    let astar = solve(&puzzle, &SolveOptions { mode: SearchMode::AStar, ..*options });
    let astar_verified = astar.solvable && verify(&puzzle, &astar.path).is_ok();

    Ok(Comparison {
        label: level.label.clone(),
        bfs,
        astar,
        astar_verified,
    })
}

/// Compare every level, showing a progress bar
///
/// # Errors
///
/// Returns an error if any level is malformed.
pub fn compare_levels(levels: &[NamedLevel], options: &SolveOptions) -> Result<ComparisonSummary> {
    let start = Instant::now();

    let pb = progress_bar(levels.len() as u64);

    let rows = levels
        .par_iter()
        .map(|level| {
            let row = compare_level(level, options);
            pb.set_message(level.label.clone());
            pb.inc(1);
            row
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish_and_clear();

    Ok(ComparisonSummary {
        rows,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::source::resolve;

    #[test]
    fn embedded_tutorials_agree() {
        let levels = resolve("1-5").unwrap();
        let summary = compare_levels(&levels, &SolveOptions::default()).unwrap();

        assert_eq!(summary.rows.len(), 5);
        assert_eq!(summary.matches(), 5);
        assert_eq!(summary.mismatches(), 0);
        assert_eq!(summary.unresolved(), 0);
        assert!(summary.rows.iter().all(|r| r.astar_verified));
    }

    #[test]
    fn budget_exhaustion_is_unresolved() {
        let levels = resolve("14").unwrap();
        let options = SolveOptions::default().with_max_states(1);
        let row = compare_level(&levels[0], &options).unwrap();

        assert!(!row.conclusive());
        assert!(!row.astar_verified);
    }

    #[test]
    fn speedup_guards_zero() {
        let levels = resolve("2 | 3:2 3:4").unwrap();
        let row = compare_level(&levels[0], &SolveOptions::default()).unwrap();
        assert_eq!(row.astar.states_explored, 0);
        assert!(row.speedup().abs() < f64::EPSILON);
    }
}
