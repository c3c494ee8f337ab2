//! Heuristic estimator for A*
//!
//! Two lower bounds on the number of moves still needed; A* uses the larger
//! of the two. Neither bound ever exceeds the true remaining distance, so the
//! first winning position A* expands is at optimal depth.

use crate::core::{Puzzle, Tube};

/// Remaining-moves estimate used by A*
#[inline]
#[must_use]
pub fn estimate(puzzle: &Puzzle) -> usize {
    reduction_bound(puzzle).max(disorder_bound(puzzle))
}

/// Pieces above target divided by the longest chain a move can produce
///
/// A move drops one piece onto a tube holding at most `capacity - 1`
/// pieces, so it can merge at most `capacity - 1` times.
#[must_use]
pub fn reduction_bound(puzzle: &Puzzle) -> usize {
    let excess = puzzle
        .piece_count()
        .saturating_sub(puzzle.target_piece_count());
    let longest_chain = puzzle
        .tubes()
        .iter()
        .map(Tube::capacity)
        .max()
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1);
    excess.div_ceil(longest_chain)
}

/// Number of sealed tubes that have to be opened to reach the target
///
/// Pieces under a larger piece stay as they are until their tube is a move
/// source (see [`Tube::sealed_len`]). If leaving every tube sealed cannot
/// reach the target, some tubes must be opened, one move each. Opening the
/// tubes with the most sealed pieces first gives the fewest such moves.
#[must_use]
pub fn disorder_bound(puzzle: &Puzzle) -> usize {
    let target = puzzle.target_piece_count();
    let mut sealed = Vec::new();
    let mut loose_value = 0u64;

    for tube in puzzle.tubes() {
        let locked = tube.sealed_len();
        if locked > 0 {
            sealed.push(locked);
        }
        loose_value += tube.pieces()[locked..]
            .iter()
            .map(|&p| u64::from(p))
            .sum::<u64>();
    }

    let mut locked_total: usize = sealed.iter().sum();
    if locked_total + loose_value.count_ones() as usize <= target {
        return 0;
    }

    // Every sealed tube keeps at least one loose piece on top
    sealed.sort_unstable_by(|a, b| b.cmp(a));
    for (opened, locked) in sealed.iter().enumerate() {
        locked_total -= locked;
        if locked_total < target {
            return opened + 1;
        }
    }
    sealed.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(text: &str) -> Puzzle {
        text.parse().unwrap()
    }

    #[test]
    fn reduction_bound_scales_with_capacity() {
        assert_eq!(reduction_bound(&puzzle("5 | 4:2,4")), 0);
        assert_eq!(reduction_bound(&puzzle("1 | 4:2,4")), 1);
        // excess 4, chains of up to 3
        assert_eq!(reduction_bound(&puzzle("1 | 4:2,4,8,16 4:32")), 2);
        // two-slot tubes merge once per move
        assert_eq!(reduction_bound(&puzzle("1 | 2:2 2:2 2:4 2:4 2:8")), 4);
    }

    #[test]
    fn reduction_bound_with_single_slot_tubes() {
        assert_eq!(reduction_bound(&puzzle("1 | 1:2 1:2")), 1);
    }

    #[test]
    fn disorder_bound_counts_tubes_to_open() {
        // Both 2s are sealed and each needs its own tube opened
        assert_eq!(disorder_bound(&puzzle("1 | 4:2,8 4:2,4 4:")), 2);
        assert_eq!(disorder_bound(&puzzle("2 | 4:2,4 4:4,2 4:")), 1);
    }

    #[test]
    fn disorder_bound_ignores_reachable_targets() {
        // Descending stacks are never sealed
        assert_eq!(disorder_bound(&puzzle("1 | 4:8,4,2 4:2 4:")), 0);
        // The sealed 2 can stay put: 2 + (4 + 2 + 2) is two pieces
        assert_eq!(disorder_bound(&puzzle("2 | 4:2,4 4:2 4:2")), 0);
    }

    #[test]
    fn estimate_takes_maximum() {
        let p = puzzle("1 | 4:2,8 4:2,4 4:");
        assert_eq!(reduction_bound(&p), 1);
        assert_eq!(disorder_bound(&p), 2);
        assert_eq!(estimate(&p), 2);

        let p = puzzle("1 | 2:2 2:2 2:4 2:4 2:8");
        assert_eq!(estimate(&p), 4);
    }

    #[test]
    fn estimate_never_exceeds_known_solution_lengths() {
        // Each of these is solvable in exactly the stated number of moves
        let cases = [
            ("1 | 3:2 3:2", 1),
            ("1 | 3:2 3:2 3:4 3:", 2),
            ("2 | 4:2,4 4:4,2 4:", 2),
            ("1 | 4:8,4,2 4:2 4:", 1),
            ("3 | 4:8,4,4 4:8,2,2 4:", 3),
            ("1 | 4:2,8 4:2,4 4:", 4),
            ("2 | 4:2,4 4:8,16 4:2 4:16", 4),
        ];
        for (text, moves) in cases {
            assert!(estimate(&puzzle(text)) <= moves, "{text}");
        }
    }
}
