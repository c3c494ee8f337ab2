//! Level loading utilities
//!
//! Loads level files (JSON, a single level or an array) and converts the
//! embedded compact pack into puzzles.

use super::{LEVELS, LevelConfig, LevelError};
use crate::core::Puzzle;
use std::fs;
use std::path::Path;

/// Load levels from a JSON file
///
/// Accepts either one level object or an array of them.
///
/// # Errors
///
/// Returns `LevelError::Io` if the file cannot be read and
/// `LevelError::Json` if it is not a level or list of levels.
///
/// # Examples
/// ```no_run
/// use number_sort_solver::levels::loader::load_from_file;
///
/// let levels = load_from_file("levels.json").unwrap();
/// println!("Loaded {} levels", levels.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<LevelConfig>, LevelError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_levels(&content)
}

/// Parse one level object or an array of levels
///
/// # Errors
///
/// Returns `LevelError::Json` if `content` is neither.
pub fn parse_levels(content: &str) -> Result<Vec<LevelConfig>, LevelError> {
    if content.trim_start().starts_with('[') {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(vec![serde_json::from_str(content)?])
    }
}

/// Write levels to a JSON file as a pretty-printed array
///
/// # Errors
///
/// Returns `LevelError` if serialization or the write fails.
pub fn save_to_file<P: AsRef<Path>>(path: P, levels: &[LevelConfig]) -> Result<(), LevelError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(levels)?;
    fs::write(path, json).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert compact level strings to puzzles, skipping malformed entries
///
/// # Examples
/// ```
/// use number_sort_solver::levels::loader::puzzles_from_slice;
/// use number_sort_solver::levels::LEVELS;
///
/// let puzzles = puzzles_from_slice(LEVELS);
/// assert_eq!(puzzles.len(), LEVELS.len());
/// ```
#[must_use]
pub fn puzzles_from_slice(slice: &[&str]) -> Vec<Puzzle> {
    slice.iter().filter_map(|s| s.parse().ok()).collect()
}

/// Embedded level by 1-based number
///
/// # Errors
///
/// Returns `LevelError::UnknownLevel` if there is no such level.
pub fn embedded_level(number: usize) -> Result<Puzzle, LevelError> {
    let text = number
        .checked_sub(1)
        .and_then(|i| LEVELS.get(i))
        .ok_or(LevelError::UnknownLevel(number))?;
    Ok(text.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzles_from_slice_skips_invalid() {
        let input = &["1 | 3:2 3:2", "not a level", "1 | 2:2,4,8", "2 | 4:2,4 4:"];
        let puzzles = puzzles_from_slice(input);

        assert_eq!(puzzles.len(), 2);
        assert_eq!(puzzles[0].piece_count(), 2);
        assert_eq!(puzzles[1].target_piece_count(), 2);
    }

    #[test]
    fn puzzles_from_slice_empty() {
        let input: &[&str] = &[];
        assert!(puzzles_from_slice(input).is_empty());
    }

    #[test]
    fn parse_single_and_array() {
        let single = r#"{"tubes":[{"capacity":3,"initialPieces":[2]}],"targetPieceCount":1}"#;
        assert_eq!(parse_levels(single).unwrap().len(), 1);

        let array = format!("[{single}, {single}]");
        assert_eq!(parse_levels(&array).unwrap().len(), 2);

        assert!(matches!(parse_levels("{"), Err(LevelError::Json(_))));
    }

    #[test]
    fn embedded_level_numbering() {
        assert!(embedded_level(1).is_ok());
        assert!(matches!(embedded_level(0), Err(LevelError::UnknownLevel(0))));
        assert!(matches!(
            embedded_level(LEVELS.len() + 1),
            Err(LevelError::UnknownLevel(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("number_sort_levels_{}.json", std::process::id()));
        let puzzle: Puzzle = "2 | 4:2,4 4:4,2 4:".parse().unwrap();
        let levels = vec![LevelConfig::from_puzzle(&puzzle)];

        save_to_file(&path, &levels).unwrap();
        let loaded = load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, levels);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_from_file("/definitely/not/here.json"),
            Err(LevelError::Io { .. })
        ));
    }
}
