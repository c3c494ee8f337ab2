//! Search engine
//!
//! A resumable best-first search over the move graph. The same engine runs
//! both modes: BFS pops in discovery order, A* pops by `g + h` and reopens a
//! position when it is reached again with a strictly smaller cost. BFS stops
//! as soon as a winning position is discovered; A* stops when one is taken
//! off the frontier, since a cheaper goal may still sit behind it.
//!
//! Positions are deduplicated by their canonical [`StateKey`], so tube order
//! never creates new search nodes.

use super::heuristic;
use super::result::{BranchingStats, SolverResult, Termination};
use super::strategy::{Frontier, FrontierEntry, FrontierKind, SearchMode};
use crate::core::{Move, Puzzle, StateKey};
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Default expansion budget for A*
pub const DEFAULT_ASTAR_MAX_STATES: usize = 2_000_000;

/// Default expansion budget for BFS
pub const DEFAULT_BFS_MAX_STATES: usize = 1_000_000;

/// Default wall-clock budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Expansions between progress log lines
const PROGRESS_INTERVAL: usize = 50_000;

/// Search configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    pub mode: SearchMode,
    /// Maximum number of node expansions
    pub max_states: usize,
    /// Wall-clock budget, measured from the start of the search
    pub timeout: Option<Duration>,
    /// Cap on distinct positions held in memory
    pub max_unique_states: Option<usize>,
}

impl SolveOptions {
    /// Defaults for a given mode
    #[must_use]
    pub const fn for_mode(mode: SearchMode) -> Self {
        let max_states = match mode {
            SearchMode::Bfs => DEFAULT_BFS_MAX_STATES,
            SearchMode::AStar => DEFAULT_ASTAR_MAX_STATES,
        };
        Self {
            mode,
            max_states,
            timeout: Some(DEFAULT_TIMEOUT),
            max_unique_states: None,
        }
    }

    #[must_use]
    pub const fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_unique_states(mut self, cap: Option<usize>) -> Self {
        self.max_unique_states = cap;
        self
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self::for_mode(SearchMode::AStar)
    }
}

#[derive(Debug)]
struct SearchNode {
    puzzle: Puzzle,
    parent: Option<usize>,
    mv: Option<Move>,
    g: usize,
    expanded: bool,
}

/// A search in progress
///
/// Created with [`Search::new`], driven with [`Search::step`] and turned into
/// a [`SolverResult`] with [`Search::into_result`]. All nodes are owned by
/// the search and dropped with it.
#[derive(Debug)]
pub struct Search {
    options: SolveOptions,
    nodes: Vec<SearchNode>,
    index: FxHashMap<StateKey, usize>,
    frontier: FrontierKind,
    seq: u64,
    explored: usize,
    max_depth: usize,
    dead_ends: usize,
    decision_points: usize,
    branching: BranchingStats,
    best_piece_count: usize,
    goal: Option<usize>,
    termination: Option<Termination>,
    started: Instant,
    elapsed: Duration,
}

impl Search {
    /// Start a search from `puzzle`
    ///
    /// A puzzle that is already won finishes immediately with an empty path.
    #[must_use]
    pub fn new(puzzle: Puzzle, options: SolveOptions) -> Self {
        let mut search = Self {
            options,
            nodes: Vec::new(),
            index: FxHashMap::default(),
            frontier: options.mode.frontier(),
            seq: 0,
            explored: 0,
            max_depth: 0,
            dead_ends: 0,
            decision_points: 0,
            branching: BranchingStats::default(),
            best_piece_count: puzzle.piece_count(),
            goal: None,
            termination: None,
            started: Instant::now(),
            elapsed: Duration::ZERO,
        };

        let won = puzzle.is_won();
        let h = search.estimate(&puzzle);
        search.index.insert(puzzle.state_key(), 0);
        search.nodes.push(SearchNode {
            puzzle,
            parent: None,
            mv: None,
            g: 0,
            expanded: false,
        });

        if won {
            search.goal = Some(0);
            search.finish(Termination::Solved);
        } else {
            search.enqueue(0, 0, h);
        }

        search
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Number of node expansions so far
    #[inline]
    #[must_use]
    pub const fn explored(&self) -> usize {
        self.explored
    }

    /// Number of distinct positions discovered so far
    #[inline]
    #[must_use]
    pub fn unique_states(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Fewest pieces seen in any discovered position
    #[inline]
    #[must_use]
    pub const fn best_piece_count(&self) -> usize {
        self.best_piece_count
    }

    /// Number of moves to the winning position, once one has been found
    #[must_use]
    pub fn solution_length(&self) -> Option<usize> {
        let mut cursor = self.nodes[self.goal?].parent;
        let mut length = 0;
        while let Some(id) = cursor {
            length += 1;
            cursor = self.nodes[id].parent;
        }
        Some(length)
    }

    #[inline]
    #[must_use]
    pub const fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[inline]
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.termination.is_some()
    }

    /// Fraction of the expansion budget used, in `[0, 1]`
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.is_finished() || self.options.max_states == 0 {
            return 1.0;
        }
        (self.explored as f64 / self.options.max_states as f64).clamp(0.0, 1.0)
    }

    /// Run up to `max_expansions` expansions
    ///
    /// Returns the termination reason once the search has finished, `None`
    /// while there is still work left.
    pub fn step(&mut self, max_expansions: usize) -> Option<Termination> {
        for _ in 0..max_expansions {
            if self.termination.is_some() {
                break;
            }
            self.expand_next();
        }
        self.termination
    }

    /// Stop the search; the result reports [`Termination::Cancelled`]
    pub fn cancel(&mut self) {
        self.finish(Termination::Cancelled);
    }

    /// Finish the search and collect the result
    ///
    /// A search that has not finished yet is reported as cancelled.
    #[must_use]
    pub fn into_result(mut self) -> SolverResult {
        if self.termination.is_none() {
            self.cancel();
        }
        let termination = self.termination.unwrap_or(Termination::Cancelled);

        let path = self.goal.map(|goal| self.reconstruct(goal)).unwrap_or_default();
        let final_piece_count = self.goal.map(|goal| self.nodes[goal].puzzle.piece_count());
        let solvable = termination == Termination::Solved;
        self.branching.finish();

        SolverResult {
            mode: self.options.mode,
            solvable,
            optimal_moves: solvable.then_some(path.len()),
            path,
            states_explored: self.explored,
            unique_states: self.nodes.len(),
            max_depth: self.max_depth,
            dead_ends: self.dead_ends,
            decision_points: self.decision_points,
            branching: self.branching,
            elapsed: self.elapsed,
            timed_out: termination.is_budget(),
            termination,
            initial_piece_count: self.nodes[0].puzzle.piece_count(),
            final_piece_count,
        }
    }

    fn estimate(&self, puzzle: &Puzzle) -> usize {
        if self.options.mode.uses_heuristic() {
            heuristic::estimate(puzzle)
        } else {
            0
        }
    }

    fn enqueue(&mut self, node: usize, g: usize, h: usize) {
        self.frontier.push(FrontierEntry::new(node, g, g + h, self.seq));
        self.seq += 1;
    }

    fn finish(&mut self, termination: Termination) {
        if self.termination.is_some() {
            return;
        }
        self.termination = Some(termination);
        self.elapsed = self.started.elapsed();
        debug!(
            mode = %self.options.mode,
            %termination,
            explored = self.explored,
            unique = self.nodes.len(),
            depth = self.max_depth,
            elapsed_ms = self.elapsed.as_millis(),
            "search finished"
        );
    }

    fn expand_next(&mut self) {
        if self.explored >= self.options.max_states {
            return self.finish(Termination::StateBudget);
        }
        if self
            .options
            .timeout
            .is_some_and(|limit| self.started.elapsed() >= limit)
        {
            return self.finish(Termination::Timeout);
        }

        let Some(entry) = self.frontier.pop() else {
            return self.finish(Termination::Exhausted);
        };

        // Entries left behind by a reopening are stale
        let node = &self.nodes[entry.node];
        if node.expanded || node.g != entry.g {
            return;
        }
        if self.options.mode.uses_heuristic() && node.puzzle.is_won() {
            self.goal = Some(entry.node);
            return self.finish(Termination::Solved);
        }
        let g = node.g;
        let successors = node.puzzle.successors();

        self.nodes[entry.node].expanded = true;
        self.explored += 1;

        // Expanded nodes are never winning, so zero successors is a dead end
        let branching = successors.len();
        self.branching.record(branching);
        if branching > 1 {
            self.decision_points += 1;
        }
        if branching == 0 {
            self.dead_ends += 1;
        }

        for (child, mv) in successors {
            if self.discover(entry.node, child, mv, g + 1) {
                return;
            }
        }

        if self.explored % PROGRESS_INTERVAL == 0 {
            debug!(
                mode = %self.options.mode,
                explored = self.explored,
                frontier = self.frontier_len(),
                depth = self.max_depth,
                elapsed_ms = self.started.elapsed().as_millis(),
                "search progress"
            );
        }
    }

    /// Record a successor; returns `true` when the search has finished
    fn discover(&mut self, parent: usize, child: Puzzle, mv: Move, g: usize) -> bool {
        let key = child.state_key();

        if let Some(&existing) = self.index.get(&key) {
            if self.options.mode.uses_heuristic() && g < self.nodes[existing].g {
                trace!(node = existing, old_g = self.nodes[existing].g, new_g = g, "reopening");
                let h = heuristic::estimate(&self.nodes[existing].puzzle);
                let node = &mut self.nodes[existing];
                node.parent = Some(parent);
                node.mv = Some(mv);
                node.g = g;
                node.expanded = false;
                self.enqueue(existing, g, h);
            }
            return false;
        }

        if self
            .options
            .max_unique_states
            .is_some_and(|cap| self.nodes.len() >= cap)
        {
            self.finish(Termination::MemoryBudget);
            return true;
        }

        let won = child.is_won();
        let h = self.estimate(&child);
        let id = self.nodes.len();
        self.max_depth = self.max_depth.max(g);
        self.best_piece_count = self.best_piece_count.min(child.piece_count());
        self.index.insert(key, id);
        self.nodes.push(SearchNode {
            puzzle: child,
            parent: Some(parent),
            mv: Some(mv),
            g,
            expanded: false,
        });

        if won && !self.options.mode.uses_heuristic() {
            self.goal = Some(id);
            self.finish(Termination::Solved);
            return true;
        }

        self.enqueue(id, g, h);
        false
    }

    /// Rebuild the path to `goal` with concrete tube indices
    ///
    /// Stored nodes may be tube permutations of the positions actually reached
    /// from the initial puzzle (a reopened node keeps its first arrangement),
    /// so each step is replayed and matched by canonical key.
    fn reconstruct(&self, goal: usize) -> Vec<Move> {
        let mut chain = Vec::new();
        let mut cursor = Some(goal);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.nodes[id].parent;
        }
        chain.reverse();

        let mut current = self.nodes[0].puzzle.clone();
        let mut path = Vec::with_capacity(chain.len().saturating_sub(1));

        for &id in chain.iter().skip(1) {
            let node = &self.nodes[id];
            let Some(recorded) = node.mv.as_ref() else {
                continue;
            };
            let key = node.puzzle.state_key();

            let step = current
                .apply_move(recorded.from, recorded.to)
                .filter(|(next, _)| next.state_key() == key)
                .or_else(|| {
                    current
                        .legal_moves()
                        .filter_map(|(from, to)| current.apply_move(from, to))
                        .find(|(next, _)| next.state_key() == key)
                });

            let Some((next, mv)) = step else {
                warn!(node = id, "could not replay search path, returning recorded moves");
                return chain
                    .iter()
                    .skip(1)
                    .filter_map(|&id| self.nodes[id].mv.clone())
                    .collect();
            };
            path.push(mv);
            current = next;
        }

        path
    }
}

/// Solve a puzzle to completion (or until a budget runs out)
///
/// # Examples
/// ```
/// use number_sort_solver::core::Puzzle;
/// use number_sort_solver::solver::{solve, SolveOptions};
///
/// let puzzle: Puzzle = "1 | 3:2 3:2 3:4 3:".parse().unwrap();
/// let result = solve(&puzzle, &SolveOptions::default());
/// assert!(result.solvable);
/// assert_eq!(result.optimal_moves, Some(2));
/// ```
#[must_use]
pub fn solve(puzzle: &Puzzle, options: &SolveOptions) -> SolverResult {
    let mut search = Search::new(puzzle.clone(), *options);
    while search.step(PROGRESS_INTERVAL).is_none() {}
    search.into_result()
}
