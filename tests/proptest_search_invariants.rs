//! Property-based invariant tests for the move engine and search.
//!
//! 1. The canonical key ignores tube order
//! 2. A move leaves the destination tube fully settled
//! 3. Moves conserve total value and never add pieces
//! 4. Solver paths replay cleanly through the strict verifier
//! 5. BFS and A* agree on solvability and on the optimal move count
//! 6. Collapsing empty destinations never hides a shorter solution
//! 7. The A* estimate never exceeds the true distance

use number_sort_solver::core::{Piece, Puzzle, StateKey, Tube};
use number_sort_solver::solver::heuristic::estimate;
use number_sort_solver::solver::{SearchMode, SolveOptions, Termination, solve, verify};
use proptest::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

// ── Strategies ──────────────────────────────────────────────────────────

fn piece_strategy() -> impl Strategy<Value = Piece> {
    (1u32..=4).prop_map(|exp| 1 << exp)
}

fn tube_strategy() -> impl Strategy<Value = Tube> {
    (2usize..=4).prop_flat_map(|capacity| {
        prop::collection::vec(piece_strategy(), 0..=capacity)
            .prop_map(move |pieces| Tube::new(capacity, pieces).unwrap())
    })
}

fn puzzle_strategy() -> impl Strategy<Value = Puzzle> {
    (prop::collection::vec(tube_strategy(), 2..=4), 1usize..=3)
        .prop_map(|(tubes, target)| Puzzle::new(tubes, target).unwrap())
}

fn options(mode: SearchMode) -> SolveOptions {
    SolveOptions::for_mode(mode)
        .with_max_states(20_000)
        .with_timeout(None)
}

/// Plain BFS over every legal move, no destination collapsing
///
/// `None` when the budget runs out, `Some(None)` when no win is reachable.
fn reference_moves(start: &Puzzle, budget: usize) -> Option<Option<usize>> {
    if start.is_won() {
        return Some(Some(0));
    }
    let mut seen: FxHashSet<StateKey> = FxHashSet::default();
    seen.insert(start.state_key());
    let mut queue = VecDeque::from([(start.clone(), 0usize)]);
    let mut expanded = 0;

    while let Some((puzzle, depth)) = queue.pop_front() {
        expanded += 1;
        if expanded > budget {
            return None;
        }
        for (from, to) in puzzle.legal_moves() {
            let Some((next, _)) = puzzle.apply_move(from, to) else {
                continue;
            };
            if !seen.insert(next.state_key()) {
                continue;
            }
            if next.is_won() {
                return Some(Some(depth + 1));
            }
            queue.push_back((next, depth + 1));
        }
    }
    Some(None)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Canonical key ignores tube order
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn state_key_is_permutation_invariant(
        (puzzle, shuffled) in puzzle_strategy().prop_flat_map(|p| {
            let tubes = p.tubes().to_vec();
            (Just(p), Just(tubes).prop_shuffle())
        })
    ) {
        let permuted = Puzzle::new(shuffled, puzzle.target_piece_count()).unwrap();
        prop_assert_eq!(puzzle.state_key(), permuted.state_key());
    }

    #[test]
    fn state_key_separates_different_contents(puzzle in puzzle_strategy()) {
        for (from, to) in puzzle.legal_moves() {
            let (next, mv) = puzzle.apply_move(from, to).unwrap();
            // A move that merges changes the piece multiset
            if mv.merged() {
                prop_assert_ne!(puzzle.state_key(), next.state_key());
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2-3. Move application
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn destination_is_settled_after_move(puzzle in puzzle_strategy()) {
        for (from, to) in puzzle.legal_moves() {
            let (next, mv) = puzzle.apply_move(from, to).unwrap();
            let mut dest = next.tubes()[to].clone();
            prop_assert!(dest.settle().is_empty(), "move {} left merges behind", mv);
            prop_assert_eq!(mv.merge_results.len(), mv.chain_length);
        }
    }

    #[test]
    fn moves_conserve_value(puzzle in puzzle_strategy()) {
        for (from, to) in puzzle.legal_moves() {
            let (next, mv) = puzzle.apply_move(from, to).unwrap();
            prop_assert_eq!(next.total_value(), puzzle.total_value());
            prop_assert_eq!(next.piece_count() + mv.pieces_removed(), puzzle.piece_count());
            prop_assert!(next.tubes().iter().all(|t| t.len() <= t.capacity()));
        }
    }

    #[test]
    fn illegal_moves_change_nothing(puzzle in puzzle_strategy(), from in 0usize..5, to in 0usize..5) {
        let legal = puzzle.can_move(from, to);
        prop_assert_eq!(legal, puzzle.apply_move(from, to).is_some());
        if from == to {
            prop_assert!(!legal);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4-7. Search
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn solver_paths_verify(puzzle in puzzle_strategy()) {
        for mode in [SearchMode::Bfs, SearchMode::AStar] {
            let result = solve(&puzzle, &options(mode));
            if result.solvable {
                let verified = verify(&puzzle, &result.path).unwrap();
                prop_assert_eq!(Some(verified.moves), result.optimal_moves);
                prop_assert!(verified.final_piece_count <= puzzle.target_piece_count());
                prop_assert_eq!(Some(verified.final_piece_count), result.final_piece_count);
            } else {
                prop_assert!(result.path.is_empty());
                prop_assert_eq!(result.optimal_moves, None);
            }
        }
    }

    #[test]
    fn astar_matches_bfs(puzzle in puzzle_strategy()) {
        let bfs = solve(&puzzle, &options(SearchMode::Bfs));
        let astar = solve(&puzzle, &options(SearchMode::AStar));

        if bfs.termination.is_conclusive() && astar.termination.is_conclusive() {
            prop_assert_eq!(bfs.solvable, astar.solvable);
            prop_assert_eq!(bfs.optimal_moves, astar.optimal_moves, "{}", puzzle);
        }
    }

    #[test]
    fn collapsed_search_matches_plain_bfs(puzzle in puzzle_strategy()) {
        let Some(expected) = reference_moves(&puzzle, 20_000) else {
            return Ok(());
        };
        for mode in [SearchMode::Bfs, SearchMode::AStar] {
            let result = solve(&puzzle, &options(mode));
            if result.termination.is_conclusive() {
                prop_assert_eq!(result.optimal_moves, expected, "{} with {}", puzzle, mode);
            }
        }
    }

    #[test]
    fn estimate_is_a_lower_bound(puzzle in puzzle_strategy()) {
        if let Some(Some(moves)) = reference_moves(&puzzle, 20_000) {
            prop_assert!(estimate(&puzzle) <= moves, "{}: estimate {} > {}", puzzle, estimate(&puzzle), moves);
        }
    }

    #[test]
    fn timed_out_means_budget(puzzle in puzzle_strategy()) {
        let result = solve(&puzzle, &options(SearchMode::Bfs).with_max_states(3));
        prop_assert_eq!(result.timed_out, result.termination.is_budget());
        if result.termination == Termination::Exhausted {
            prop_assert!(!result.solvable);
        }
    }
}
