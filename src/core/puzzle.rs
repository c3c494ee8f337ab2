//! Puzzle state and move rules
//!
//! A `Puzzle` is an ordered list of tubes plus the target piece count. It is
//! immutable from the outside: applying a move always produces a new puzzle.
//!
//! Puzzles also have a compact one-line text form used by the embedded level
//! pack and the CLI:
//!
//! ```text
//! <target> | <capacity>:<bottom>,...,<top> <capacity>: ...
//! ```
//!
//! An empty tube is written as just `<capacity>:`.

use super::{Move, Piece, PuzzleError, StateKey, Tube};
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A full puzzle position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Puzzle {
    tubes: Vec<Tube>,
    target_piece_count: usize,
}

impl Puzzle {
    /// Create a puzzle from its tubes and target piece count
    ///
    /// # Errors
    /// Returns `PuzzleError::NoTubes` if `tubes` is empty.
    pub fn new(tubes: Vec<Tube>, target_piece_count: usize) -> Result<Self, PuzzleError> {
        if tubes.is_empty() {
            return Err(PuzzleError::NoTubes);
        }
        Ok(Self {
            tubes,
            target_piece_count,
        })
    }

    /// Build a puzzle from `(capacity, pieces)` pairs
    ///
    /// # Errors
    /// Returns `PuzzleError` if there are no tubes or any tube is invalid.
    ///
    /// # Examples
    /// ```
    /// use number_sort_solver::core::Puzzle;
    ///
    /// let puzzle = Puzzle::from_layout(&[(3, &[2]), (3, &[2])], 1).unwrap();
    /// assert_eq!(puzzle.piece_count(), 2);
    /// assert!(!puzzle.is_won());
    /// ```
    pub fn from_layout(layout: &[(usize, &[Piece])], target_piece_count: usize) -> Result<Self, PuzzleError> {
        let tubes = layout
            .iter()
            .enumerate()
            .map(|(index, &(capacity, pieces))| {
                Tube::new(capacity, pieces.to_vec()).map_err(|source| PuzzleError::Tube { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tubes, target_piece_count)
    }

    #[inline]
    #[must_use]
    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    #[inline]
    #[must_use]
    pub const fn target_piece_count(&self) -> usize {
        self.target_piece_count
    }

    /// Same tubes with a different target
    #[must_use]
    pub fn with_target(mut self, target_piece_count: usize) -> Self {
        self.target_piece_count = target_piece_count;
        self
    }

    /// Total number of pieces on the board
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.tubes.iter().map(Tube::len).sum()
    }

    /// Sum of every piece value (invariant under moves)
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.tubes.iter().map(Tube::total_value).sum()
    }

    /// Fewest pieces any sequence of moves could possibly leave
    ///
    /// Merging never changes the total value, and a set of distinct powers of
    /// two with that sum has exactly one piece per set bit.
    #[must_use]
    pub fn theoretical_min_pieces(&self) -> usize {
        self.total_value().count_ones() as usize
    }

    #[must_use]
    pub fn total_capacity(&self) -> usize {
        self.tubes.iter().map(Tube::capacity).sum()
    }

    #[must_use]
    pub fn empty_tube_count(&self) -> usize {
        self.tubes.iter().filter(|t| t.is_empty()).count()
    }

    /// Share of all slots that hold a piece
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        let capacity = self.total_capacity();
        if capacity == 0 {
            return 0.0;
        }
        self.piece_count() as f64 / capacity as f64
    }

    /// Win condition: at most `target_piece_count` pieces remain
    #[inline]
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.piece_count() <= self.target_piece_count
    }

    /// Pieces remain but no legal move exists
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.piece_count() > 0 && self.legal_moves().next().is_none()
    }

    /// Whether moving the top of `from` onto `to` is legal
    ///
    /// Out-of-range indices and `from == to` are never legal.
    ///
    /// # Examples
    /// ```
    /// use number_sort_solver::core::Puzzle;
    ///
    /// let puzzle: Puzzle = "1 | 3:4,2 3:8 3:".parse().unwrap();
    /// assert!(puzzle.can_move(0, 1));
    /// assert!(puzzle.can_move(0, 2));
    /// assert!(!puzzle.can_move(2, 0));
    /// ```
    #[must_use]
    pub fn can_move(&self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let (Some(source), Some(dest)) = (self.tubes.get(from), self.tubes.get(to)) else {
            return false;
        };
        source.top().is_some_and(|piece| dest.accepts(piece))
    }

    /// Apply a move, returning the resulting puzzle and the move record
    ///
    /// Returns `None` when the move is illegal. `self` is never modified.
    #[must_use]
    pub fn apply_move(&self, from: usize, to: usize) -> Option<(Self, Move)> {
        if !self.can_move(from, to) {
            return None;
        }

        let mut next = self.clone();
        let moved_value = next.tubes[from].pop()?;
        let merge_results = next.tubes[to].push_and_settle(moved_value);

        let mv = Move {
            from,
            to,
            moved_value,
            chain_length: merge_results.len(),
            merge_results,
        };
        Some((next, mv))
    }

    /// Every legal `(from, to)` pair, in index order
    pub fn legal_moves(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.tubes.len();
        (0..n)
            .flat_map(move |from| (0..n).map(move |to| (from, to)))
            .filter(|&(from, to)| self.can_move(from, to))
    }

    /// Legal moves with equivalent empty destinations collapsed
    ///
    /// From a given source, dropping onto empty tubes of the same capacity
    /// leads to positions with the same [`StateKey`], so only the first empty
    /// destination of each capacity is kept.
    #[must_use]
    pub fn search_moves(&self) -> Vec<(usize, usize)> {
        let n = self.tubes.len();
        let mut moves = Vec::new();
        let mut empty_capacities = Vec::new();

        for from in 0..n {
            if self.tubes[from].is_empty() {
                continue;
            }
            empty_capacities.clear();
            for to in 0..n {
                if !self.can_move(from, to) {
                    continue;
                }
                let dest = &self.tubes[to];
                if dest.is_empty() {
                    if empty_capacities.contains(&dest.capacity()) {
                        continue;
                    }
                    empty_capacities.push(dest.capacity());
                }
                moves.push((from, to));
            }
        }

        moves
    }

    /// Successor positions reachable in one move, empty destinations collapsed
    #[must_use]
    pub fn successors(&self) -> Vec<(Self, Move)> {
        self.search_moves()
            .into_iter()
            .filter_map(|(from, to)| self.apply_move(from, to))
            .collect()
    }

    /// Canonical, tube-order-independent key for deduplication
    #[must_use]
    pub fn state_key(&self) -> StateKey {
        StateKey::from_tubes(&self.tubes)
    }

    /// Order-sensitive 64-bit fingerprint of the whole puzzle
    ///
    /// Covers tube order, capacities and the target; used to tell whether a
    /// finished computation still matches the latest input.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} |", self.target_piece_count)?;
        for tube in &self.tubes {
            write!(f, " {tube}")?;
        }
        Ok(())
    }
}

impl FromStr for Puzzle {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, layout) = s
            .split_once('|')
            .ok_or_else(|| PuzzleError::Parse(format!("missing '|' in {s:?}")))?;

        let target = target
            .trim()
            .parse::<usize>()
            .map_err(|e| PuzzleError::Parse(format!("bad target {:?}: {e}", target.trim())))?;

        let tubes = layout
            .split_whitespace()
            .enumerate()
            .map(|(index, token)| parse_tube(token).and_then(|(capacity, pieces)| {
                Tube::new(capacity, pieces).map_err(|source| PuzzleError::Tube { index, source })
            }))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(tubes, target)
    }
}

fn parse_tube(token: &str) -> Result<(usize, Vec<Piece>), PuzzleError> {
    let (capacity, pieces) = token
        .split_once(':')
        .ok_or_else(|| PuzzleError::Parse(format!("tube {token:?} is missing ':'")))?;

    let capacity = capacity
        .parse::<usize>()
        .map_err(|e| PuzzleError::Parse(format!("bad capacity in {token:?}: {e}")))?;

    if pieces.is_empty() {
        return Ok((capacity, Vec::new()));
    }

    let pieces = pieces
        .split(',')
        .map(|p| {
            p.parse::<Piece>()
                .map_err(|e| PuzzleError::Parse(format!("bad piece {p:?} in {token:?}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((capacity, pieces))
}
