//! Path verification
//!
//! Replays a move path from the initial puzzle and checks every recorded
//! move against what the move rules actually produce.

use crate::core::{Move, Piece, Puzzle};
use thiserror::Error;

/// Why a path failed verification
///
/// Step indices are zero-based positions in the path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("step {step}: moving tube {from} onto tube {to} is not legal")]
    IllegalMove { step: usize, from: usize, to: usize },
    #[error("step {step}: chain length is {actual} but the path records {expected}")]
    ChainLengthMismatch {
        step: usize,
        expected: usize,
        actual: usize,
    },
    #[error("step {step}: moved value is {actual} but the path records {expected}")]
    MovedValueMismatch {
        step: usize,
        expected: Piece,
        actual: Piece,
    },
    #[error("step {step}: no legal move moves a {value} with a chain of {chain_length}")]
    NoMatchingMove {
        step: usize,
        value: Piece,
        chain_length: usize,
    },
    #[error("path ends with {actual} pieces but the target is {target}")]
    TargetMissed { actual: usize, target: usize },
}

impl VerifyError {
    /// Index of the failing step, if the failure is tied to one
    #[must_use]
    pub const fn step(&self) -> Option<usize> {
        match self {
            Self::IllegalMove { step, .. }
            | Self::ChainLengthMismatch { step, .. }
            | Self::MovedValueMismatch { step, .. }
            | Self::NoMatchingMove { step, .. } => Some(*step),
            Self::TargetMissed { .. } => None,
        }
    }
}

/// A successfully verified path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verified {
    pub moves: usize,
    pub final_piece_count: usize,
}

/// Replay `path` exactly as recorded
///
/// # Errors
/// Returns the first `VerifyError` encountered: an illegal move, a chain
/// length or moved value that differs from the record, or a final position
/// that still has more pieces than the target.
pub fn verify(puzzle: &Puzzle, path: &[Move]) -> Result<Verified, VerifyError> {
    let mut current = puzzle.clone();

    for (step, recorded) in path.iter().enumerate() {
        let Some((next, actual)) = current.apply_move(recorded.from, recorded.to) else {
            return Err(VerifyError::IllegalMove {
                step,
                from: recorded.from,
                to: recorded.to,
            });
        };

        if actual.chain_length != recorded.chain_length {
            return Err(VerifyError::ChainLengthMismatch {
                step,
                expected: recorded.chain_length,
                actual: actual.chain_length,
            });
        }
        if actual.moved_value != recorded.moved_value {
            return Err(VerifyError::MovedValueMismatch {
                step,
                expected: recorded.moved_value,
                actual: actual.moved_value,
            });
        }

        current = next;
    }

    finish(&current, path.len())
}

/// Replay `path`, tolerating tube indices that no longer line up
///
/// Each step first tries the recorded `(from, to)`. If that does not move
/// the recorded value with the recorded chain length, any legal move that
/// does is used instead.
///
/// # Errors
/// Returns `VerifyError::NoMatchingMove` for a step no legal move can
/// reproduce, or `VerifyError::TargetMissed` if the target is not reached.
pub fn verify_relaxed(puzzle: &Puzzle, path: &[Move]) -> Result<Verified, VerifyError> {
    let mut current = puzzle.clone();

    for (step, recorded) in path.iter().enumerate() {
        let same_effect = |mv: &Move| {
            mv.moved_value == recorded.moved_value && mv.chain_length == recorded.chain_length
        };

        let next = current
            .apply_move(recorded.from, recorded.to)
            .filter(|(_, mv)| same_effect(mv))
            .or_else(|| {
                current
                    .legal_moves()
                    .filter(|&(from, _)| current.tubes()[from].top() == Some(recorded.moved_value))
                    .filter_map(|(from, to)| current.apply_move(from, to))
                    .find(|(_, mv)| same_effect(mv))
            });

        let Some((next, _)) = next else {
            return Err(VerifyError::NoMatchingMove {
                step,
                value: recorded.moved_value,
                chain_length: recorded.chain_length,
            });
        };
        current = next;
    }

    finish(&current, path.len())
}

fn finish(current: &Puzzle, moves: usize) -> Result<Verified, VerifyError> {
    let actual = current.piece_count();
    let target = current.target_piece_count();
    if actual > target {
        return Err(VerifyError::TargetMissed { actual, target });
    }
    Ok(Verified {
        moves,
        final_piece_count: actual,
    })
}
