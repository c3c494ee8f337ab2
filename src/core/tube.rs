//! Tube representation
//!
//! A tube stores its pieces bottom to top together with a fixed capacity.
//! The only way pieces combine is through [`Tube::settle`], which runs the
//! chain reaction on the top of the tube.

use super::TubeError;
use std::fmt;

/// A piece value (always a power of two)
pub type Piece = u32;

/// Largest piece value accepted when building a tube
///
/// Merges can grow pieces past this, but only up to the total value of the
/// puzzle, which keeps every merge result inside `u32`.
pub const MAX_PIECE: Piece = 1 << 24;

/// A fixed-capacity stack of piece values
///
/// Invariant: `len() <= capacity()` at all times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tube {
    capacity: usize,
    pieces: Vec<Piece>,
}

impl Tube {
    /// Create a tube from a capacity and its pieces (bottom to top)
    ///
    /// # Errors
    /// Returns `TubeError` if:
    /// - Capacity is zero
    /// - There are more pieces than the capacity allows
    /// - A piece is not a power of two or exceeds [`MAX_PIECE`]
    ///
    /// # Examples
    /// ```
    /// use number_sort_solver::core::Tube;
    ///
    /// let tube = Tube::new(4, vec![8, 4, 2]).unwrap();
    /// assert_eq!(tube.top(), Some(2));
    ///
    /// assert!(Tube::new(2, vec![2, 4, 8]).is_err());
    /// assert!(Tube::new(3, vec![6]).is_err());
    /// ```
    pub fn new(capacity: usize, pieces: impl Into<Vec<Piece>>) -> Result<Self, TubeError> {
        let pieces = pieces.into();

        if capacity == 0 {
            return Err(TubeError::ZeroCapacity);
        }

        if pieces.len() > capacity {
            return Err(TubeError::Overfull {
                pieces: pieces.len(),
                capacity,
            });
        }

        for &piece in &pieces {
            if !piece.is_power_of_two() {
                return Err(TubeError::NotPowerOfTwo(piece));
            }
            if piece > MAX_PIECE {
                return Err(TubeError::TooLarge(piece));
            }
        }

        Ok(Self { capacity, pieces })
    }

    /// Create an empty tube
    ///
    /// # Errors
    /// Returns `TubeError::ZeroCapacity` if `capacity` is zero.
    pub fn empty(capacity: usize) -> Result<Self, TubeError> {
        Self::new(capacity, Vec::new())
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pieces from bottom to top
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pieces.len() >= self.capacity
    }

    /// The top piece, if any
    #[inline]
    #[must_use]
    pub fn top(&self) -> Option<Piece> {
        self.pieces.last().copied()
    }

    /// Number of free slots left
    #[inline]
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.capacity - self.pieces.len()
    }

    /// Sum of all piece values in the tube
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.pieces.iter().map(|&p| u64::from(p)).sum()
    }

    /// Whether `piece` may be dropped onto this tube
    ///
    /// A tube accepts a piece when it has room and is either empty or has a
    /// top piece at least as large as the incoming one.
    #[inline]
    #[must_use]
    pub fn accepts(&self, piece: Piece) -> bool {
        if self.is_full() {
            return false;
        }
        self.top().is_none_or(|top| piece <= top)
    }

    /// Number of pieces locked under a larger piece
    ///
    /// Counts everything below the highest spot where a piece sits directly
    /// on a smaller one. Values only grow in place, so those pieces can
    /// neither move nor merge until this tube is used as a move source.
    #[must_use]
    pub fn sealed_len(&self) -> usize {
        self.pieces
            .windows(2)
            .rposition(|w| w[1] > w[0])
            .map_or(0, |i| i + 1)
    }

    pub(crate) fn pop(&mut self) -> Option<Piece> {
        self.pieces.pop()
    }

    /// Push a piece and run the chain reaction
    ///
    /// Callers must check [`Tube::accepts`] first.
    pub(crate) fn push_and_settle(&mut self, piece: Piece) -> Vec<Piece> {
        debug_assert!(!self.is_full(), "push onto a full tube");
        self.pieces.push(piece);
        self.settle()
    }

    /// Run the chain reaction on top of the tube
    ///
    /// While the two top pieces are equal they are replaced by their sum.
    /// Returns the value produced by every merge, in order; the number of
    /// entries is the chain length.
    ///
    /// # Examples
    /// ```
    /// use number_sort_solver::core::Tube;
    ///
    /// let mut tube = Tube::new(5, vec![8, 4, 2, 2]).unwrap();
    /// assert_eq!(tube.settle(), vec![4, 8, 16]);
    /// assert_eq!(tube.pieces(), &[16]);
    /// ```
    pub fn settle(&mut self) -> Vec<Piece> {
        let mut merges = Vec::new();

        // Every merge shortens the tube by one, so capacity bounds the loop.
        for _ in 0..self.capacity {
            let n = self.pieces.len();
            if n < 2 || self.pieces[n - 1] != self.pieces[n - 2] {
                break;
            }
            let merged = self.pieces[n - 1] * 2;
            self.pieces.truncate(n - 2);
            self.pieces.push(merged);
            merges.push(merged);
        }

        merges
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.capacity)?;
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}
