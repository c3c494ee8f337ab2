//! Batch level generation
//!
//! For every slot of every group, draws random layouts, solves them with A*
//! and keeps the first candidate the acceptance policy likes. Candidates are
//! drawn in batches from one seeded generator per slot and solved in
//! parallel, so a given seed always produces the same levels.

mod groups;
pub mod layout;
pub mod policy;

pub use groups::{GroupConfig, builtin_group, builtin_groups, load_groups};
pub use layout::random_layout;
pub use policy::{Accepted, Rejection, evaluate};

use crate::levels::LevelConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default attempts per level
pub const DEFAULT_MAX_ATTEMPTS: usize = 200;

/// Attempts after which a group's windows are relaxed
pub const DEFAULT_RELAX_AFTER: usize = 100;

/// Candidates solved in parallel per batch
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub groups: Vec<GroupConfig>,
    pub levels_per_group: usize,
    pub max_attempts: usize,
    pub relax_after: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl GeneratorConfig {
    #[must_use]
    pub fn new(groups: Vec<GroupConfig>, seed: u64) -> Self {
        Self {
            groups,
            levels_per_group: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            relax_after: DEFAULT_RELAX_AFTER,
            batch_size: DEFAULT_BATCH_SIZE,
            seed,
        }
    }

    #[must_use]
    pub const fn with_levels_per_group(mut self, count: usize) -> Self {
        self.levels_per_group = count;
        self
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Total number of level slots
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.groups.len() * self.levels_per_group
    }
}

/// An accepted level with the numbers that got it accepted
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub level: LevelConfig,
    pub group: String,
    pub attempts: usize,
    pub optimal_moves: usize,
    pub states_explored: usize,
    pub fill_ratio: f64,
    pub avg_branching: f64,
    pub dead_end_ratio: f64,
}

/// A slot that ran out of attempts
#[derive(Debug, Clone)]
pub struct SlotFailure {
    pub group: String,
    pub slot: usize,
    pub attempts: usize,
    /// Rejection counts by kind
    pub rejections: FxHashMap<&'static str, usize>,
}

/// Outcome of one level slot
#[derive(Debug, Clone)]
pub enum SlotOutcome {
    Accepted(GeneratedLevel),
    Failed(SlotFailure),
}

/// Everything a generation run produced
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub levels: Vec<GeneratedLevel>,
    pub failures: Vec<SlotFailure>,
    pub elapsed: Duration,
}

impl GenerationReport {
    /// The accepted levels in their JSON form
    #[must_use]
    pub fn level_configs(&self) -> Vec<LevelConfig> {
        self.levels.iter().map(|g| g.level.clone()).collect()
    }
}

/// Generate levels for every slot, calling `on_slot` as each one finishes
///
/// Accepted levels are numbered from 1 in generation order.
pub fn generate<F: FnMut(&SlotOutcome)>(
    config: &GeneratorConfig,
    mut on_slot: F,
) -> GenerationReport {
    let start = Instant::now();
    let mut report = GenerationReport::default();

    for (group_index, group) in config.groups.iter().enumerate() {
        info!(group = %group.label, levels = config.levels_per_group, "generating group");
        for slot in 0..config.levels_per_group {
            let seed = config
                .seed
                .wrapping_add((group_index * config.levels_per_group + slot) as u64);
            let mut outcome = generate_slot(group, slot, seed, config);
            if let SlotOutcome::Accepted(generated) = &mut outcome {
                generated.level.id = u32::try_from(report.levels.len() + 1).ok();
            }
            on_slot(&outcome);
            match outcome {
                SlotOutcome::Accepted(generated) => report.levels.push(generated),
                SlotOutcome::Failed(failure) => report.failures.push(failure),
            }
        }
    }

    report.elapsed = start.elapsed();
    report
}

/// Search for one level of `group`
#[must_use]
pub fn generate_slot(
    group: &GroupConfig,
    slot: usize,
    seed: u64,
    config: &GeneratorConfig,
) -> SlotOutcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let relaxed = group.relaxed();
    let batch_size = config.batch_size.max(1);
    let mut rejections: FxHashMap<&'static str, usize> = FxHashMap::default();
    let mut attempts = 0;

    while attempts < config.max_attempts {
        let size = batch_size.min(config.max_attempts - attempts);
        let batch: Vec<(usize, &GroupConfig, Option<_>)> = (0..size)
            .map(|i| {
                let attempt = attempts + i + 1;
                let effective = if attempt > config.relax_after {
                    &relaxed
                } else {
                    group
                };
                (attempt, effective, random_layout(&mut rng, effective))
            })
            .collect();
        attempts += batch.len();

        let verdicts: Vec<Option<Result<Accepted, Rejection>>> = batch
            .par_iter()
            .map(|(_, effective, candidate)| candidate.as_ref().map(|p| evaluate(p, effective)))
            .collect();

        for ((attempt, _, _), verdict) in batch.iter().zip(verdicts) {
            match verdict {
                None => *rejections.entry("layout").or_insert(0) += 1,
                Some(Err(rejection)) => {
                    debug!(group = %group.label, slot, attempt, %rejection, "candidate rejected");
                    *rejections.entry(rejection.kind()).or_insert(0) += 1;
                }
                Some(Ok(accepted)) => {
                    info!(
                        group = %group.label,
                        slot,
                        attempt,
                        moves = accepted.optimal_moves,
                        fill = accepted.fill_ratio,
                        min_pieces = accepted.puzzle.target_piece_count(),
                        "level accepted"
                    );
                    return SlotOutcome::Accepted(generated_level(group, *attempt, &accepted));
                }
            }
        }
    }

    info!(group = %group.label, slot, attempts, "no level accepted");
    SlotOutcome::Failed(SlotFailure {
        group: group.label.clone(),
        slot,
        attempts,
        rejections,
    })
}

fn generated_level(group: &GroupConfig, attempts: usize, accepted: &Accepted) -> GeneratedLevel {
    let mut level = LevelConfig::from_puzzle(&accepted.puzzle);
    level.difficulty = Some(group.label.clone());
    GeneratedLevel {
        level,
        group: group.label.clone(),
        attempts,
        optimal_moves: accepted.optimal_moves,
        states_explored: accepted.result.states_explored,
        fill_ratio: accepted.fill_ratio,
        avg_branching: accepted.result.branching.avg,
        dead_end_ratio: accepted.dead_end_ratio(),
    }
}
