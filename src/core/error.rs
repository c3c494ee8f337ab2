//! Construction and parse errors for tubes and puzzles

use super::Piece;
use thiserror::Error;

/// Error type for an invalid tube
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TubeError {
    #[error("tube capacity must be at least 1")]
    ZeroCapacity,
    #[error("tube holds {pieces} pieces but its capacity is {capacity}")]
    Overfull { pieces: usize, capacity: usize },
    #[error("piece value {0} is not a power of two")]
    NotPowerOfTwo(Piece),
    #[error("piece value {0} exceeds the supported maximum")]
    TooLarge(Piece),
}

/// Error type for an invalid puzzle or malformed puzzle text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("puzzle must contain at least one tube")]
    NoTubes,
    #[error("tube {index}: {source}")]
    Tube {
        index: usize,
        #[source]
        source: TubeError,
    },
    #[error("malformed puzzle text: {0}")]
    Parse(String),
}
