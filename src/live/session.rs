//! Debounced live solving for an interactive host
//!
//! The host calls [`LiveSolver::request`] whenever the puzzle changes and
//! [`LiveSolver::poll`] from its event loop. Work only starts once the input
//! has been stable for the debounce window, runs one slice per poll, and a
//! result is only published if it still matches the latest request.
//!
//! Time is passed in explicitly so the host owns the clock.

use super::{CancelToken, ChunkStatus, ChunkedSolve, LiveConfig, LiveOutcome};
use crate::core::Puzzle;
use std::time::Instant;
use tracing::debug;

/// A published answer for the latest puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveAnswer {
    /// Fingerprint of the puzzle this answer belongs to
    pub fingerprint: u64,
    pub min_pieces: usize,
    /// Moves needed to reach `min_pieces`, when known
    pub optimal_moves: Option<usize>,
    /// `min_pieces` is proven, not just the best seen within budget
    pub exact: bool,
}

impl LiveAnswer {
    fn from_outcome(fingerprint: u64, outcome: LiveOutcome) -> Option<Self> {
        let min_pieces = outcome.min_pieces()?;
        let optimal_moves = match outcome {
            LiveOutcome::Solved { optimal_moves, .. } => Some(optimal_moves),
            _ => None,
        };
        Some(Self {
            fingerprint,
            min_pieces,
            optimal_moves,
            exact: outcome.is_exact(),
        })
    }
}

/// What happened during one poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveEvent {
    /// Nothing requested or nothing left to do
    Idle,
    /// Inside the debounce window
    Waiting,
    /// A slice ran; fraction of the budget used so far
    Progress(f64),
    /// A fresh answer for the latest puzzle
    Finished(LiveAnswer),
    /// A superseded or cancelled computation ended without an answer
    Discarded,
}

#[derive(Debug)]
struct Pending {
    puzzle: Puzzle,
    fingerprint: u64,
    due: Instant,
}

#[derive(Debug)]
struct Running {
    job: ChunkedSolve,
    fingerprint: u64,
}

/// Debounced, cancellable, staleness-checked solver session
#[derive(Debug)]
pub struct LiveSolver {
    config: LiveConfig,
    pending: Option<Pending>,
    running: Option<Running>,
    latest: Option<u64>,
    token: CancelToken,
    answer: Option<LiveAnswer>,
}

impl LiveSolver {
    #[must_use]
    pub fn new(config: LiveConfig) -> Self {
        Self {
            config,
            pending: None,
            running: None,
            latest: None,
            token: CancelToken::new(),
            answer: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &LiveConfig {
        &self.config
    }

    /// Latest published answer, if it belongs to the latest request
    #[must_use]
    pub fn answer(&self) -> Option<LiveAnswer> {
        self.answer.filter(|a| Some(a.fingerprint) == self.latest)
    }

    /// Work is scheduled or running
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some() || self.running.is_some()
    }

    /// Progress of the running computation, if any
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.running.as_ref().map(|r| r.job.progress())
    }

    /// Register a new puzzle
    ///
    /// An identical puzzle to the latest request is ignored. Otherwise the
    /// previous computation's token is cancelled (it stops at its next slice)
    /// and a new computation is scheduled for `now + debounce`.
    pub fn request(&mut self, puzzle: Puzzle, now: Instant) {
        let fingerprint = puzzle.fingerprint();
        if self.latest == Some(fingerprint) {
            return;
        }

        debug!(fingerprint, "live request scheduled");
        self.latest = Some(fingerprint);
        self.answer = None;
        self.token.cancel();
        self.token = CancelToken::new();
        self.pending = Some(Pending {
            puzzle,
            fingerprint,
            due: now + self.config.debounce,
        });
    }

    /// Forget the current input and cancel any work
    pub fn clear(&mut self) {
        self.token.cancel();
        self.token = CancelToken::new();
        self.latest = None;
        self.pending = None;
        self.answer = None;
    }

    /// Advance the session by at most one slice
    pub fn poll(&mut self, now: Instant) -> LiveEvent {
        // A running job goes first so superseded work can wind down
        if let Some(running) = self.running.as_mut() {
            return match running.job.run_chunk() {
                ChunkStatus::Pending(progress) => LiveEvent::Progress(progress),
                ChunkStatus::Done(outcome) => {
                    let fingerprint = running.fingerprint;
                    self.running = None;
                    self.publish(fingerprint, outcome)
                }
            };
        }

        let Some(pending) = self.pending.take() else {
            return LiveEvent::Idle;
        };
        if now < pending.due {
            self.pending = Some(pending);
            return LiveEvent::Waiting;
        }

        let job = ChunkedSolve::new(&pending.puzzle, &self.config, self.token.clone());
        self.running = Some(Running {
            job,
            fingerprint: pending.fingerprint,
        });
        self.poll(now)
    }

    fn publish(&mut self, fingerprint: u64, outcome: LiveOutcome) -> LiveEvent {
        if self.latest != Some(fingerprint) {
            debug!(fingerprint, "discarding stale live result");
            return LiveEvent::Discarded;
        }
        match LiveAnswer::from_outcome(fingerprint, outcome) {
            Some(answer) => {
                self.answer = Some(answer);
                LiveEvent::Finished(answer)
            }
            None => LiveEvent::Discarded,
        }
    }
}

impl Default for LiveSolver {
    fn default() -> Self {
        Self::new(LiveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn puzzle(text: &str) -> Puzzle {
        text.parse().unwrap()
    }

    fn config() -> LiveConfig {
        LiveConfig::default().with_debounce(Duration::from_millis(500))
    }

    fn run_until_settled(solver: &mut LiveSolver, now: Instant) -> LiveEvent {
        loop {
            match solver.poll(now) {
                LiveEvent::Progress(_) => {}
                other => return other,
            }
        }
    }

    #[test]
    fn idle_without_requests() {
        let mut solver = LiveSolver::new(config());
        assert_eq!(solver.poll(Instant::now()), LiveEvent::Idle);
        assert!(!solver.is_busy());
        assert_eq!(solver.answer(), None);
    }

    #[test]
    fn waits_for_debounce_window() {
        let t0 = Instant::now();
        let mut solver = LiveSolver::new(config());
        solver.request(puzzle("1 | 4:8,4,2 4:2 4:"), t0);

        assert_eq!(solver.poll(t0), LiveEvent::Waiting);
        assert_eq!(solver.poll(t0 + Duration::from_millis(499)), LiveEvent::Waiting);
        assert!(solver.is_busy());

        let event = run_until_settled(&mut solver, t0 + Duration::from_millis(500));
        let LiveEvent::Finished(answer) = event else {
            panic!("expected an answer, got {event:?}");
        };
        assert_eq!(answer.min_pieces, 1);
        assert_eq!(answer.optimal_moves, Some(1));
        assert!(answer.exact);
        assert_eq!(solver.answer(), Some(answer));
        assert_eq!(solver.poll(t0 + Duration::from_secs(1)), LiveEvent::Idle);
    }

    #[test]
    fn new_request_restarts_debounce() {
        let t0 = Instant::now();
        let mut solver = LiveSolver::new(config());
        solver.request(puzzle("1 | 4:8,4,2 4:2 4:"), t0);
        solver.request(puzzle("3 | 4:2,4 4:4,2 4:"), t0 + Duration::from_millis(400));

        assert_eq!(solver.poll(t0 + Duration::from_millis(600)), LiveEvent::Waiting);

        let event = run_until_settled(&mut solver, t0 + Duration::from_millis(900));
        let LiveEvent::Finished(answer) = event else {
            panic!("expected an answer, got {event:?}");
        };
        assert_eq!(answer.min_pieces, 2);
        assert_eq!(answer.fingerprint, puzzle("3 | 4:2,4 4:4,2 4:").fingerprint());
    }

    #[test]
    fn identical_request_is_ignored() {
        let t0 = Instant::now();
        let mut solver = LiveSolver::new(config());
        let p = puzzle("1 | 4:8,4,2 4:2 4:");
        solver.request(p.clone(), t0);
        solver.request(p, t0 + Duration::from_millis(400));

        // Debounce still measured from the first request
        assert!(matches!(
            run_until_settled(&mut solver, t0 + Duration::from_millis(500)),
            LiveEvent::Finished(_)
        ));
    }

    #[test]
    fn superseded_job_is_discarded() {
        let t0 = Instant::now();
        let mut solver = LiveSolver::new(config().with_chunk_size(1));
        solver.request(puzzle("1 | 4:2,4 4:4,2 4: 4:8"), t0);

        let start = t0 + Duration::from_millis(500);
        assert!(matches!(solver.poll(start), LiveEvent::Progress(_)));

        // Input changes while the first job is mid-flight
        solver.request(puzzle("1 | 3:2 3:2"), start);
        assert_eq!(solver.poll(start), LiveEvent::Discarded);
        assert_eq!(solver.poll(start), LiveEvent::Waiting);

        let event = run_until_settled(&mut solver, start + Duration::from_millis(500));
        let LiveEvent::Finished(answer) = event else {
            panic!("expected an answer, got {event:?}");
        };
        assert_eq!(answer.min_pieces, 1);
    }

    #[test]
    fn clear_drops_answer_and_work() {
        let t0 = Instant::now();
        let mut solver = LiveSolver::new(config().with_chunk_size(1));
        solver.request(puzzle("1 | 4:2,4 4:4,2 4: 4:8"), t0);
        assert!(matches!(solver.poll(t0 + Duration::from_millis(500)), LiveEvent::Progress(_)));

        solver.clear();
        assert_eq!(solver.poll(t0 + Duration::from_secs(1)), LiveEvent::Discarded);
        assert_eq!(solver.poll(t0 + Duration::from_secs(1)), LiveEvent::Idle);
        assert_eq!(solver.answer(), None);
    }
}
