//! Move records
//!
//! A `Move` describes one transfer of the top piece from one tube to another
//! together with the chain reaction it triggered.

use super::Piece;
use serde::Serialize;
use std::fmt;

/// One applied move and its effect
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    /// Source tube index
    pub from: usize,
    /// Destination tube index
    pub to: usize,
    /// Value of the piece that was moved
    pub moved_value: Piece,
    /// Number of merges in the resulting chain reaction
    pub chain_length: usize,
    /// Value produced by each merge, in order
    pub merge_results: Vec<Piece>,
}

impl Move {
    /// Whether the move caused at least one merge
    #[inline]
    #[must_use]
    pub const fn merged(&self) -> bool {
        self.chain_length > 0
    }

    /// Pieces removed from the board by this move
    #[inline]
    #[must_use]
    pub const fn pieces_removed(&self) -> usize {
        self.chain_length
    }

    /// Final merge value, if the move merged at all
    #[must_use]
    pub fn final_value(&self) -> Option<Piece> {
        self.merge_results.last().copied()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tubes are numbered from 1 for humans
        write!(f, "{} -> {} ({})", self.from + 1, self.to + 1, self.moved_value)?;
        if let Some(value) = self.final_value() {
            write!(f, " merge x{} = {value}", self.chain_length)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_move_display() {
        let mv = Move {
            from: 0,
            to: 2,
            moved_value: 4,
            chain_length: 0,
            merge_results: vec![],
        };
        assert!(!mv.merged());
        assert_eq!(mv.final_value(), None);
        assert_eq!(mv.to_string(), "1 -> 3 (4)");
    }

    #[test]
    fn merging_move_display() {
        let mv = Move {
            from: 1,
            to: 0,
            moved_value: 2,
            chain_length: 2,
            merge_results: vec![4, 8],
        };
        assert!(mv.merged());
        assert_eq!(mv.pieces_removed(), 2);
        assert_eq!(mv.to_string(), "2 -> 1 (2) merge x2 = 8");
    }
}
