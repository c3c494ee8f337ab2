//! Difficulty groups
//!
//! A group describes the shape of the levels it produces and the window of
//! solutions it accepts. The four built-in groups can be replaced by a JSON
//! file with the same (camelCase) fields.

use crate::core::Piece;
use crate::levels::LevelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Amount the move window grows below and above when a group is relaxed
const RELAX_MOVES_BELOW: usize = 3;
const RELAX_MOVES_ABOVE: usize = 5;
/// Amount the fill window grows on each side when a group is relaxed
const RELAX_FILL: f64 = 0.05;

/// Shape and acceptance window of one difficulty group
///
/// All ranges are inclusive `[low, high]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    pub label: String,
    pub tube_count: (usize, usize),
    pub empty_tubes: (usize, usize),
    pub capacity_range: (usize, usize),
    /// Minimum number of distinct capacities among the tubes
    #[serde(default = "default_capacity_variants")]
    pub min_capacity_variants: usize,
    /// Values a layout may draw from
    pub values: Vec<Piece>,
    pub fill_range: (f64, f64),
    pub target_piece_count: (usize, usize),
    pub move_range: (usize, usize),
    #[serde(default = "default_solver_timeout_ms")]
    pub solver_timeout_ms: u64,
    #[serde(default = "default_solver_max_states")]
    pub solver_max_states: usize,
}

const fn default_capacity_variants() -> usize {
    2
}

const fn default_solver_timeout_ms() -> u64 {
    45_000
}

const fn default_solver_max_states() -> usize {
    1_000_000
}

impl GroupConfig {
    #[must_use]
    pub const fn solver_timeout(&self) -> Duration {
        Duration::from_millis(self.solver_timeout_ms)
    }

    /// Whether an optimal solution length falls inside the move window
    #[inline]
    #[must_use]
    pub const fn accepts_moves(&self, moves: usize) -> bool {
        moves >= self.move_range.0 && moves <= self.move_range.1
    }

    /// Wider copy of this group, used once half the attempts have failed
    #[must_use]
    pub fn relaxed(&self) -> Self {
        Self {
            move_range: (
                self.move_range.0.saturating_sub(RELAX_MOVES_BELOW).max(1),
                self.move_range.1 + RELAX_MOVES_ABOVE,
            ),
            fill_range: (
                (self.fill_range.0 - RELAX_FILL).max(0.0),
                (self.fill_range.1 + RELAX_FILL).min(1.0),
            ),
            ..self.clone()
        }
    }
}

/// The four built-in groups, easiest first
#[must_use]
pub fn builtin_groups() -> Vec<GroupConfig> {
    vec![
        GroupConfig {
            label: "Medium".to_string(),
            tube_count: (5, 6),
            empty_tubes: (0, 1),
            capacity_range: (4, 5),
            min_capacity_variants: 2,
            values: vec![2, 4, 8, 16],
            fill_range: (0.65, 0.75),
            target_piece_count: (1, 2),
            move_range: (10, 15),
            solver_timeout_ms: 30_000,
            solver_max_states: 500_000,
        },
        GroupConfig {
            label: "Hard".to_string(),
            tube_count: (5, 6),
            empty_tubes: (0, 1),
            capacity_range: (3, 5),
            min_capacity_variants: 2,
            values: vec![2, 4, 8, 16, 32],
            fill_range: (0.70, 0.82),
            target_piece_count: (1, 2),
            move_range: (12, 18),
            solver_timeout_ms: 45_000,
            solver_max_states: 1_000_000,
        },
        GroupConfig {
            label: "Hard-Expert".to_string(),
            tube_count: (5, 7),
            empty_tubes: (0, 0),
            capacity_range: (3, 5),
            min_capacity_variants: 2,
            values: vec![2, 4, 8, 16, 32],
            fill_range: (0.75, 0.88),
            target_piece_count: (1, 3),
            move_range: (14, 22),
            solver_timeout_ms: 45_000,
            solver_max_states: 2_000_000,
        },
        GroupConfig {
            label: "Expert".to_string(),
            tube_count: (6, 7),
            empty_tubes: (0, 0),
            capacity_range: (3, 6),
            min_capacity_variants: 2,
            values: vec![2, 4, 8, 16, 32],
            fill_range: (0.80, 0.90),
            target_piece_count: (2, 4),
            move_range: (18, 28),
            solver_timeout_ms: 45_000,
            solver_max_states: 1_500_000,
        },
    ]
}

/// Look up a built-in group by label, ignoring case
#[must_use]
pub fn builtin_group(label: &str) -> Option<GroupConfig> {
    builtin_groups()
        .into_iter()
        .find(|g| g.label.eq_ignore_ascii_case(label))
}

/// Load groups from a JSON array
///
/// # Errors
///
/// Returns `LevelError::Io` if the file cannot be read and
/// `LevelError::Json` if it does not hold an array of groups.
pub fn load_groups<P: AsRef<Path>>(path: P) -> Result<Vec<GroupConfig>, LevelError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_groups_are_ordered_and_sane() {
        let groups = builtin_groups();
        assert_eq!(groups.len(), 4);
        for g in &groups {
            assert!(g.tube_count.0 <= g.tube_count.1, "{}", g.label);
            assert!(g.capacity_range.0 >= 2, "{}", g.label);
            assert!(g.fill_range.0 < g.fill_range.1, "{}", g.label);
            assert!(g.values.iter().all(|v| v.is_power_of_two()), "{}", g.label);
        }
        let lows: Vec<usize> = groups.iter().map(|g| g.move_range.0).collect();
        assert!(lows.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn relaxed_widens_windows() {
        let hard = builtin_group("hard").unwrap();
        let relaxed = hard.relaxed();
        assert_eq!(relaxed.move_range, (9, 23));
        assert!((relaxed.fill_range.0 - 0.65).abs() < 1e-9);
        assert!((relaxed.fill_range.1 - 0.87).abs() < 1e-9);
        assert_eq!(relaxed.tube_count, hard.tube_count);
    }

    #[test]
    fn relaxed_keeps_at_least_one_move() {
        let mut g = builtin_group("medium").unwrap();
        g.move_range = (2, 4);
        assert_eq!(g.relaxed().move_range, (1, 9));
    }

    #[test]
    fn accepts_moves_is_inclusive() {
        let g = builtin_group("Medium").unwrap();
        assert!(!g.accepts_moves(9));
        assert!(g.accepts_moves(10));
        assert!(g.accepts_moves(15));
        assert!(!g.accepts_moves(16));
    }

    #[test]
    fn groups_from_json_use_defaults() {
        let json = r#"[{
            "label": "Tiny",
            "tubeCount": [3, 3],
            "emptyTubes": [1, 1],
            "capacityRange": [3, 4],
            "values": [2, 4],
            "fillRange": [0.4, 0.6],
            "targetPieceCount": [1, 1],
            "moveRange": [2, 6]
        }]"#;
        let groups: Vec<GroupConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(groups[0].min_capacity_variants, 2);
        assert_eq!(groups[0].solver_timeout(), Duration::from_secs(45));
        assert_eq!(groups[0].solver_max_states, 1_000_000);
    }

    #[test]
    fn unknown_group_is_none() {
        assert!(builtin_group("legendary").is_none());
    }
}
