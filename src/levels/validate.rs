//! Level validation
//!
//! Checks an authored level before it is solved or saved. Errors make a
//! level unusable; warnings flag levels that are legal but probably not what
//! the author intended.

use super::LevelConfig;
use crate::core::Piece;
use std::fmt;

const MAX_COMFORTABLE_TUBES: usize = 12;
const MAX_COMFORTABLE_CAPACITY: usize = 10;
const MAX_COMFORTABLE_VALUE: Piece = 2048;

/// A single validation finding
///
/// Tube and slot numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    NoTubes,
    CapacityTooSmall { tube: usize, capacity: usize },
    Overfull { tube: usize, pieces: usize, capacity: usize },
    NotPowerOfTwo { tube: usize, slot: usize, value: Piece },
    ValueTooSmall { tube: usize, slot: usize, value: Piece },
    TargetAbovePieces { target: usize, pieces: usize },
    ManyTubes(usize),
    HighCapacity { tube: usize, capacity: usize },
    HighValue { tube: usize, slot: usize, value: Piece },
    NoEmptyTube,
    TargetEqualsPieces,
}

impl Issue {
    /// Whether this finding makes the level invalid
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::NoTubes
                | Self::CapacityTooSmall { .. }
                | Self::Overfull { .. }
                | Self::NotPowerOfTwo { .. }
                | Self::ValueTooSmall { .. }
                | Self::TargetAbovePieces { .. }
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTubes => write!(f, "level must have at least one tube"),
            Self::CapacityTooSmall { tube, capacity } => {
                write!(f, "tube {tube}: capacity {capacity} is below 2")
            }
            Self::Overfull {
                tube,
                pieces,
                capacity,
            } => write!(f, "tube {tube}: has {pieces} pieces but capacity is {capacity}"),
            Self::NotPowerOfTwo { tube, slot, value } => {
                write!(f, "tube {tube}, piece {slot}: {value} is not a power of two")
            }
            Self::ValueTooSmall { tube, slot, value } => {
                write!(f, "tube {tube}, piece {slot}: {value} is below 2")
            }
            Self::TargetAbovePieces { target, pieces } => {
                write!(f, "target {target} exceeds the {pieces} starting pieces")
            }
            Self::ManyTubes(count) => write!(f, "{count} tubes is more than usual"),
            Self::HighCapacity { tube, capacity } => {
                write!(f, "tube {tube}: capacity {capacity} is unusually high")
            }
            Self::HighValue { tube, slot, value } => {
                write!(f, "tube {tube}, piece {slot}: {value} is unusually high")
            }
            Self::NoEmptyTube => write!(f, "no empty tube, level may be unsolvable"),
            Self::TargetEqualsPieces => {
                write!(f, "target equals the starting piece count, no merges needed")
            }
        }
    }
}

/// Aggregate numbers about a level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub total_pieces: usize,
    pub total_value: u64,
    pub empty_tubes: usize,
    /// Popcount of the total value: no play can end with fewer pieces
    pub theoretical_min: usize,
}

/// Result of validating a level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub stats: LevelStats,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, issue: Issue) {
        if issue.is_error() {
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }
}

/// Validate an authored level
#[must_use]
pub fn validate(level: &LevelConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if level.tubes.is_empty() {
        report.push(Issue::NoTubes);
    }
    if level.tubes.len() > MAX_COMFORTABLE_TUBES {
        report.push(Issue::ManyTubes(level.tubes.len()));
    }

    let mut stats = LevelStats::default();

    for (i, tube_config) in level.tubes.iter().enumerate() {
        let tube = i + 1;
        let capacity = tube_config.capacity;

        if capacity < 2 {
            report.push(Issue::CapacityTooSmall { tube, capacity });
        }
        if capacity > MAX_COMFORTABLE_CAPACITY {
            report.push(Issue::HighCapacity { tube, capacity });
        }

        let pieces: Vec<Piece> = tube_config.pieces().collect();
        if pieces.len() > capacity {
            report.push(Issue::Overfull {
                tube,
                pieces: pieces.len(),
                capacity,
            });
        }

        for (j, &value) in pieces.iter().enumerate() {
            let slot = j + 1;
            if !value.is_power_of_two() {
                report.push(Issue::NotPowerOfTwo { tube, slot, value });
            }
            if value < 2 {
                report.push(Issue::ValueTooSmall { tube, slot, value });
            }
            if value > MAX_COMFORTABLE_VALUE {
                report.push(Issue::HighValue { tube, slot, value });
            }
            stats.total_value += u64::from(value);
        }

        stats.total_pieces += pieces.len();
        if pieces.is_empty() {
            stats.empty_tubes += 1;
        }
    }

    if stats.empty_tubes == 0 && stats.total_pieces > 0 {
        report.push(Issue::NoEmptyTube);
    }

    stats.theoretical_min = stats.total_value.count_ones() as usize;

    if level.target_piece_count > stats.total_pieces {
        report.push(Issue::TargetAbovePieces {
            target: level.target_piece_count,
            pieces: stats.total_pieces,
        });
    }
    if level.target_piece_count == stats.total_pieces {
        report.push(Issue::TargetEqualsPieces);
    }

    report.stats = stats;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::TubeConfig;

    fn level(tubes: &[(usize, &[Piece])], target: usize) -> LevelConfig {
        LevelConfig {
            id: None,
            name: None,
            difficulty: None,
            tubes: tubes
                .iter()
                .map(|&(capacity, pieces)| TubeConfig {
                    capacity,
                    initial_pieces: pieces.iter().copied().map(Some).collect(),
                })
                .collect(),
            target_piece_count: target,
        }
    }

    #[test]
    fn clean_level_has_no_issues() {
        let report = validate(&level(&[(4, &[2, 4]), (4, &[4, 2]), (4, &[])], 2));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.stats,
            LevelStats {
                total_pieces: 4,
                total_value: 12,
                empty_tubes: 1,
                theoretical_min: 2,
            }
        );
    }

    #[test]
    fn structural_errors() {
        let report = validate(&level(&[(1, &[2, 6]), (4, &[1])], 1));
        assert!(!report.is_valid());
        assert!(report.errors.contains(&Issue::CapacityTooSmall { tube: 1, capacity: 1 }));
        assert!(report.errors.contains(&Issue::Overfull {
            tube: 1,
            pieces: 2,
            capacity: 1
        }));
        assert!(report.errors.contains(&Issue::NotPowerOfTwo {
            tube: 1,
            slot: 2,
            value: 6
        }));
        assert!(report.errors.contains(&Issue::ValueTooSmall {
            tube: 2,
            slot: 1,
            value: 1
        }));
    }

    #[test]
    fn no_tubes_is_an_error() {
        let report = validate(&level(&[], 0));
        assert_eq!(report.errors, vec![Issue::NoTubes]);
    }

    #[test]
    fn target_checks() {
        let above = validate(&level(&[(3, &[2]), (3, &[])], 2));
        assert!(above.errors.contains(&Issue::TargetAbovePieces { target: 2, pieces: 1 }));

        let equal = validate(&level(&[(3, &[2]), (3, &[])], 1));
        assert!(equal.is_valid());
        assert!(equal.warnings.contains(&Issue::TargetEqualsPieces));
    }

    #[test]
    fn comfort_warnings() {
        let high: &[Piece] = &[4096];
        let tubes: Vec<(usize, &[Piece])> = (0..13).map(|_| (11, high)).collect();
        let report = validate(&level(&tubes, 1));
        assert!(report.is_valid());
        assert!(report.warnings.contains(&Issue::ManyTubes(13)));
        assert!(report.warnings.contains(&Issue::HighCapacity { tube: 1, capacity: 11 }));
        assert!(report.warnings.contains(&Issue::HighValue {
            tube: 13,
            slot: 1,
            value: 4096
        }));
        assert!(report.warnings.contains(&Issue::NoEmptyTube));
    }

    #[test]
    fn placeholders_do_not_count() {
        let mut lvl = level(&[(3, &[2]), (3, &[])], 1);
        lvl.tubes[1].initial_pieces = vec![None, None];
        let report = validate(&lvl);
        assert_eq!(report.stats.total_pieces, 1);
        assert_eq!(report.stats.empty_tubes, 1);
    }

    #[test]
    fn issue_messages_are_one_based() {
        let issue = Issue::Overfull {
            tube: 3,
            pieces: 5,
            capacity: 4,
        };
        assert_eq!(issue.to_string(), "tube 3: has 5 pieces but capacity is 4");
        assert!(issue.is_error());
        assert!(!Issue::NoEmptyTube.is_error());
    }
}
