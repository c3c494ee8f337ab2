//! Random level layouts
//!
//! Builds a candidate puzzle for a group: tube count, capacities with the
//! required variety, a fill ratio, a random subset of the group's values and
//! a piece-by-piece placement that never stacks a value on an equal one.

use super::GroupConfig;
use crate::core::{Piece, Puzzle, Tube};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Attempts at drawing capacities with enough distinct values
const CAPACITY_ATTEMPTS: usize = 20;

/// Smallest and largest number of values a layout draws from
const MIN_VALUE_SUBSET: usize = 3;
const MAX_VALUE_SUBSET: usize = 5;

/// Failed placements allowed per requested piece
const STUCK_FACTOR: usize = 10;

/// Uniform draw from an inclusive pair, tolerating reversed bounds
fn draw<R: Rng + ?Sized>(rng: &mut R, (low, high): (usize, usize)) -> usize {
    if low >= high {
        low
    } else {
        rng.random_range(low..=high)
    }
}

fn draw_fill<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    if low < high {
        rng.random_range(low..high)
    } else {
        low
    }
}

/// Tube capacities, redrawn until enough of them differ
fn capacities<R: Rng + ?Sized>(rng: &mut R, group: &GroupConfig, tube_count: usize) -> Vec<usize> {
    let mut caps = Vec::new();
    for _ in 0..CAPACITY_ATTEMPTS {
        caps = (0..tube_count)
            .map(|_| draw(rng, group.capacity_range).max(1))
            .collect();
        let mut distinct = caps.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() >= group.min_capacity_variants {
            break;
        }
    }
    caps
}

/// Draw a random candidate layout
///
/// Returns `None` when fewer than 80% of the requested pieces could be
/// placed, or when the group describes no tubes or no values.
pub fn random_layout<R: Rng + ?Sized>(rng: &mut R, group: &GroupConfig) -> Option<Puzzle> {
    if group.values.is_empty() {
        return None;
    }
    let tube_count = draw(rng, group.tube_count);
    if tube_count == 0 {
        return None;
    }
    let empty_count = draw(rng, group.empty_tubes).min(tube_count - 1);

    let caps = capacities(rng, group, tube_count);
    let total_capacity: usize = caps.iter().sum();
    let fill = draw_fill(rng, group.fill_range);
    let filled_count = tube_count - empty_count;
    let requested = ((total_capacity as f64 * fill).round() as usize).max(filled_count);

    let subset_size = draw(
        rng,
        (
            MIN_VALUE_SUBSET.min(group.values.len()),
            MAX_VALUE_SUBSET.min(group.values.len()),
        ),
    );
    let mut values: Vec<Piece> = group
        .values
        .choose_multiple(rng, subset_size)
        .copied()
        .collect();
    values.sort_unstable();

    let target = draw(rng, group.target_piece_count);

    let mut order: Vec<usize> = (0..tube_count).collect();
    order.shuffle(rng);
    let filled = &order[empty_count..];

    let mut stacks: Vec<Vec<Piece>> = vec![Vec::new(); tube_count];
    let mut placed = 0;
    let mut stuck = 0;
    while placed < requested && stuck < requested * STUCK_FACTOR {
        let open: Vec<usize> = filled
            .iter()
            .copied()
            .filter(|&t| stacks[t].len() < caps[t])
            .collect();
        let Some(&t) = open.choose(rng) else {
            break;
        };
        let top = stacks[t].last().copied();
        let allowed: Vec<Piece> = values.iter().copied().filter(|&v| Some(v) != top).collect();
        match allowed.choose(rng) {
            Some(&v) => {
                stacks[t].push(v);
                placed += 1;
            }
            None => stuck += 1,
        }
    }

    if placed * 5 < requested * 4 {
        return None;
    }

    let tubes = caps
        .into_iter()
        .zip(stacks)
        .map(|(cap, pieces)| Tube::new(cap, pieces))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Puzzle::new(tubes, target).ok()
}
