//! Level analysis command
//!
//! Validates a level, describes its structure and, when it is valid, solves
//! it to report how hard it is.

use super::source::NamedLevel;
use crate::core::Puzzle;
use crate::levels::{ValidationReport, validate};
use crate::solver::heuristic::{disorder_bound, estimate, reduction_bound};
use crate::solver::{SolveOptions, SolverResult, solve};

/// Structure of a valid level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Structure {
    pub tubes: usize,
    pub pieces: usize,
    pub target: usize,
    pub theoretical_min: usize,
    pub empty_tubes: usize,
    pub fill_ratio: f64,
    pub legal_moves: usize,
    /// Moves left after collapsing equivalent empty destinations
    pub distinct_moves: usize,
    pub reduction_bound: usize,
    pub disorder_bound: usize,
    pub estimate: usize,
    pub stuck: bool,
}

impl Structure {
    #[must_use]
    pub fn of(puzzle: &Puzzle) -> Self {
        Self {
            tubes: puzzle.tubes().len(),
            pieces: puzzle.piece_count(),
            target: puzzle.target_piece_count(),
            theoretical_min: puzzle.theoretical_min_pieces(),
            empty_tubes: puzzle.empty_tube_count(),
            fill_ratio: puzzle.fill_ratio(),
            legal_moves: puzzle.legal_moves().count(),
            distinct_moves: puzzle.search_moves().len(),
            reduction_bound: reduction_bound(puzzle),
            disorder_bound: disorder_bound(puzzle),
            estimate: estimate(puzzle),
            stuck: puzzle.is_stuck(),
        }
    }

    /// The target asks for fewer pieces than any play can leave
    #[must_use]
    pub const fn target_unreachable(&self) -> bool {
        self.target < self.theoretical_min
    }
}

/// Result of analyzing a level
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub label: String,
    pub validation: ValidationReport,
    /// Present when the level is valid
    pub structure: Option<Structure>,
    /// Present when the level is valid
    pub result: Option<SolverResult>,
}

impl AnalysisResult {
    /// Share of expanded positions that had no successors
    #[must_use]
    pub fn dead_end_ratio(&self) -> Option<f64> {
        let result = self.result.as_ref()?;
        (result.states_explored > 0)
            .then(|| result.dead_ends as f64 / result.states_explored as f64)
    }
}

/// Analyze a level
#[must_use]
pub fn analyze_level(level: &NamedLevel, options: &SolveOptions) -> AnalysisResult {
    let validation = validate(&level.level);
    let puzzle = validation
        .is_valid()
        .then(|| Puzzle::try_from(&level.level).ok())
        .flatten();

    let structure = puzzle.as_ref().map(Structure::of);
    let result = puzzle.as_ref().map(|p| solve(p, options));

    AnalysisResult {
        label: level.label.clone(),
        validation,
        structure,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::source::resolve;
    use crate::levels::{Issue, LevelConfig, TubeConfig};

    #[test]
    fn analyze_valid_level() {
        let level = &resolve("2 | 4:2,4 4:4,2 4:").unwrap()[0];
        let analysis = analyze_level(level, &SolveOptions::default());

        let structure = analysis.structure.unwrap();
        assert_eq!(structure.pieces, 4);
        assert_eq!(structure.theoretical_min, 2);
        assert_eq!(structure.empty_tubes, 1);
        assert_eq!(structure.disorder_bound, 1);
        assert_eq!(structure.estimate, 1);
        assert!(!structure.stuck);
        assert!(!structure.target_unreachable());
        assert!(structure.distinct_moves <= structure.legal_moves);

        let result = analysis.result.unwrap();
        assert_eq!(result.optimal_moves, Some(2));
    }

    #[test]
    fn invalid_level_is_not_solved() {
        let level = NamedLevel {
            label: "broken".to_string(),
            level: LevelConfig {
                id: None,
                name: None,
                difficulty: None,
                tubes: vec![TubeConfig {
                    capacity: 2,
                    initial_pieces: vec![Some(3)],
                }],
                target_piece_count: 1,
            },
        };
        let analysis = analyze_level(&level, &SolveOptions::default());

        assert!(!analysis.validation.is_valid());
        assert!(analysis.validation.errors.contains(&Issue::NotPowerOfTwo {
            tube: 1,
            slot: 1,
            value: 3
        }));
        assert!(analysis.structure.is_none());
        assert!(analysis.result.is_none());
        assert!(analysis.dead_end_ratio().is_none());
    }

    #[test]
    fn unreachable_target_is_flagged() {
        // 2 + 4 = 6 needs at least two pieces
        let level = &resolve("1 | 3:2 3:4 3:").unwrap()[0];
        let analysis = analyze_level(level, &SolveOptions::default());
        assert!(analysis.structure.unwrap().target_unreachable());
        assert!(!analysis.result.unwrap().solvable);
    }
}
