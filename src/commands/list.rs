//! Embedded level listing

use crate::core::Puzzle;
use crate::levels::LEVELS;

/// One line of the level listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    /// 1-based level number
    pub number: usize,
    pub tubes: usize,
    pub pieces: usize,
    pub target: usize,
    pub compact: String,
}

/// Summaries of every embedded level, skipping any that fail to parse
#[must_use]
pub fn list_levels() -> Vec<LevelSummary> {
    LEVELS
        .iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let puzzle: Puzzle = text.parse().ok()?;
            Some(LevelSummary {
                number: i + 1,
                tubes: puzzle.tubes().len(),
                pieces: puzzle.piece_count(),
                target: puzzle.target_piece_count(),
                compact: puzzle.to_string(),
            })
        })
        .collect()
}
