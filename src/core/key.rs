//! Canonical state keys
//!
//! Two puzzles whose tubes are a permutation of one another describe the same
//! position, so the key is built from the tubes in sorted order.

use super::Tube;

/// Order-independent identity of a puzzle position
///
/// Encodes each tube as `[capacity, len, pieces...]` after sorting the tubes
/// by their contents (then capacity). Equal keys mean equal multisets of
/// tubes. The target piece count is not part of the key; it is constant
/// within a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[u32]>);

impl StateKey {
    /// Build the key for a set of tubes
    #[must_use]
    pub fn from_tubes(tubes: &[Tube]) -> Self {
        let mut order: Vec<&Tube> = tubes.iter().collect();
        order.sort_unstable_by(|a, b| {
            a.pieces()
                .cmp(b.pieces())
                .then_with(|| a.capacity().cmp(&b.capacity()))
        });

        let size = tubes.iter().map(|t| t.len() + 2).sum();
        let mut encoded = Vec::with_capacity(size);
        for tube in order {
            encoded.push(tube.capacity() as u32);
            encoded.push(tube.len() as u32);
            encoded.extend_from_slice(tube.pieces());
        }

        Self(encoded.into_boxed_slice())
    }

    /// Raw encoded form
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}
