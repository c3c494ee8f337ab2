//! Core domain types for Number Sort
//!
//! Tubes, puzzles and moves, together with the move rules (legality, chain
//! reactions) and the canonical state key used to deduplicate search nodes.
//! Nothing in here knows about searching; the solver builds on top of it.

mod error;
mod key;
mod moves;
mod puzzle;
mod tube;

pub use error::{PuzzleError, TubeError};
pub use key::StateKey;
pub use moves::Move;
pub use puzzle::Puzzle;
pub use tube::{MAX_PIECE, Piece, Tube};
