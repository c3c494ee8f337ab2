//! Level definitions
//!
//! The JSON level contract shared with editors and level files, the level
//! pack embedded at build time, file loading and level validation.

mod embedded;
pub mod loader;
pub mod validate;

pub use embedded::{LEVELS, LEVELS_COUNT};
pub use validate::{Issue, LevelStats, ValidationReport, validate};

use crate::core::{Piece, Puzzle, PuzzleError, Tube};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading or saving levels
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    Puzzle(#[from] PuzzleError),
    #[error("no level numbered {0}")]
    UnknownLevel(usize),
}

/// One tube as authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TubeConfig {
    pub capacity: usize,
    /// Bottom to top; `null` entries are editor placeholders and are ignored
    #[serde(default)]
    pub initial_pieces: Vec<Option<Piece>>,
}

impl TubeConfig {
    /// Pieces with placeholders removed
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.initial_pieces.iter().filter_map(|p| *p)
    }
}

/// A level as authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub tubes: Vec<TubeConfig>,
    pub target_piece_count: usize,
}

impl LevelConfig {
    /// Describe a puzzle as a level
    #[must_use]
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        Self {
            id: None,
            name: None,
            difficulty: None,
            tubes: puzzle
                .tubes()
                .iter()
                .map(|t| TubeConfig {
                    capacity: t.capacity(),
                    initial_pieces: t.pieces().iter().copied().map(Some).collect(),
                })
                .collect(),
            target_piece_count: puzzle.target_piece_count(),
        }
    }
}

impl TryFrom<&LevelConfig> for Puzzle {
    type Error = PuzzleError;

    fn try_from(level: &LevelConfig) -> Result<Self, Self::Error> {
        let tubes = level
            .tubes
            .iter()
            .enumerate()
            .map(|(index, t)| {
                Tube::new(t.capacity, t.pieces().collect::<Vec<_>>())
                    .map_err(|source| PuzzleError::Tube { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tubes, level.target_piece_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_count_matches_const() {
        assert_eq!(LEVELS.len(), LEVELS_COUNT);
        assert!(LEVELS_COUNT > 0);
    }

    #[test]
    fn embedded_levels_parse_and_validate() {
        for &text in LEVELS {
            let puzzle: Puzzle = text.parse().unwrap_or_else(|e| panic!("{text}: {e}"));
            let report = validate(&LevelConfig::from_puzzle(&puzzle));
            assert!(report.is_valid(), "{text}: {:?}", report.errors);
        }
    }

    #[test]
    fn json_contract_filters_placeholders() {
        let json = r#"{
            "tubes": [
                {"capacity": 4, "initialPieces": [8, null, 4]},
                {"capacity": 4, "initialPieces": []},
                {"capacity": 3}
            ],
            "targetPieceCount": 1
        }"#;
        let level: LevelConfig = serde_json::from_str(json).unwrap();
        let puzzle = Puzzle::try_from(&level).unwrap();

        assert_eq!(puzzle.tubes().len(), 3);
        assert_eq!(puzzle.tubes()[0].pieces(), &[8, 4]);
        assert!(puzzle.tubes()[2].is_empty());
        assert_eq!(puzzle.target_piece_count(), 1);
    }

    #[test]
    fn invalid_level_reports_tube() {
        let level = LevelConfig {
            id: Some(7),
            name: None,
            difficulty: None,
            tubes: vec![TubeConfig {
                capacity: 1,
                initial_pieces: vec![Some(2), Some(4)],
            }],
            target_piece_count: 1,
        };
        assert!(matches!(
            Puzzle::try_from(&level),
            Err(PuzzleError::Tube { index: 0, .. })
        ));
    }

    #[test]
    fn puzzle_to_json_and_back() {
        let puzzle: Puzzle = "2 | 4:2,4 4:4,2 4:".parse().unwrap();
        let json = serde_json::to_string(&LevelConfig::from_puzzle(&puzzle)).unwrap();
        assert!(json.contains("\"targetPieceCount\":2"));
        assert!(!json.contains("\"name\""));

        let level: LevelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(Puzzle::try_from(&level).unwrap(), puzzle);
    }
}
