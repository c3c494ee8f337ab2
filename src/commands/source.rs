//! Puzzle sources for the CLI
//!
//! A source argument is one of:
//! - `all`: every embedded level
//! - a level number (`7`) or range (`3-9`) from the embedded pack
//! - a path to a JSON level file
//! - a compact puzzle string (`"2 | 4:2,4 4:4,2 4:"`)

use crate::core::Puzzle;
use crate::levels::loader::{embedded_level, load_from_file};
use crate::levels::{LEVELS_COUNT, LevelConfig};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// A level with a human-readable label
#[derive(Debug, Clone)]
pub struct NamedLevel {
    pub label: String,
    pub level: LevelConfig,
}

impl NamedLevel {
    #[must_use]
    pub fn from_puzzle(label: impl Into<String>, puzzle: &Puzzle) -> Self {
        Self {
            label: label.into(),
            level: LevelConfig::from_puzzle(puzzle),
        }
    }

    /// The level as a puzzle
    ///
    /// # Errors
    ///
    /// Returns an error if the level is malformed.
    pub fn puzzle(&self) -> Result<Puzzle> {
        Puzzle::try_from(&self.level).with_context(|| format!("level {}", self.label))
    }
}

fn embedded(number: usize) -> Result<NamedLevel> {
    let puzzle = embedded_level(number)?;
    Ok(NamedLevel::from_puzzle(format!("Level {number}"), &puzzle))
}

fn parse_range(query: &str) -> Option<(usize, usize)> {
    let (start, end) = query.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

/// Resolve a source argument to levels
///
/// # Errors
///
/// Returns an error if the level number is unknown, the file cannot be
/// loaded, or the text is not a valid compact puzzle.
pub fn resolve(query: &str) -> Result<Vec<NamedLevel>> {
    let query = query.trim();

    if query.eq_ignore_ascii_case("all") {
        return (1..=LEVELS_COUNT).map(embedded).collect();
    }

    if let Ok(number) = query.parse::<usize>() {
        return Ok(vec![embedded(number)?]);
    }

    if let Some((start, end)) = parse_range(query) {
        if start == 0 || start > end {
            bail!("invalid level range {query}");
        }
        return (start..=end).map(embedded).collect();
    }

    let path = Path::new(query);
    if path.is_file() {
        let levels = load_from_file(path).with_context(|| format!("loading {query}"))?;
        let stem = path
            .file_stem()
            .map_or_else(|| query.to_string(), |s| s.to_string_lossy().into_owned());
        return Ok(levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| NamedLevel {
                label: level
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{stem} #{}", i + 1)),
                level,
            })
            .collect());
    }

    let puzzle: Puzzle = query
        .parse()
        .with_context(|| format!("'{query}' is not a level number, file or puzzle"))?;
    Ok(vec![NamedLevel::from_puzzle("puzzle", &puzzle)])
}
