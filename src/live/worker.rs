//! Background solving on a worker thread

use super::{CancelToken, ChunkStatus, ChunkedSolve, LiveConfig};
use crate::core::Puzzle;
use std::sync::mpsc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Handle to a solve running on its own thread
#[derive(Debug)]
pub struct SolveHandle {
    cancel: CancelToken,
    rx: mpsc::Receiver<Option<usize>>,
    join: Option<JoinHandle<()>>,
}

impl SolveHandle {
    /// Ask the worker to stop at its next slice boundary
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Non-blocking check for the answer
    ///
    /// The outer `Option` is `None` while the worker is still running.
    #[must_use]
    pub fn try_recv(&self) -> Option<Option<usize>> {
        self.rx.try_recv().ok()
    }

    /// Block until the worker finishes
    ///
    /// Returns the minimum piece count found, or `None` if the solve was
    /// cancelled or the worker panicked.
    #[must_use]
    pub fn wait(mut self) -> Option<usize> {
        let result = self.rx.recv().ok().flatten();
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            warn!("solver worker panicked, no answer available");
        }
        result
    }
}

/// Solve for the minimum piece count on a worker thread
///
/// The search runs in slices of [`LiveConfig::chunk_size`] expansions,
/// yields the thread between slices and reports progress in `[0, 1]` after
/// each one. `token` is checked at the start of every slice.
pub fn solve_async<F>(
    puzzle: Puzzle,
    max_states: usize,
    mut on_progress: F,
    token: CancelToken,
) -> SolveHandle
where
    F: FnMut(f64) + Send + 'static,
{
    let config = LiveConfig::default().with_max_states(max_states);
    let cancel = token.clone();
    let (tx, rx) = mpsc::channel();

    let join = std::thread::spawn(move || {
        let mut job = ChunkedSolve::new(&puzzle, &config, token);
        let outcome = loop {
            match job.run_chunk() {
                ChunkStatus::Pending(progress) => {
                    on_progress(progress);
                    std::thread::yield_now();
                }
                ChunkStatus::Done(outcome) => break outcome,
            }
        };
        on_progress(1.0);
        if tx.send(outcome.min_pieces()).is_err() {
            debug!("solver handle dropped before the answer arrived");
        }
    });

    SolveHandle {
        cancel,
        rx,
        join: Some(join),
    }
}
