//! Background execution.
//!
//! Listener and peer calls are synchronous and may block on the network,
//! so they never run on the caller's thread or on async worker threads.
//! [`Dispatcher`] hands them to tokio's blocking pool.
//!
//! [`TaskChain`] serializes jobs that must run in submission order (one
//! chain per notification topic, one per match). A chain owns a blocking
//! task only while it has queued jobs:
//!
//! ```text
//! push(job) ──► queue ──► idle? ──yes──► spawn drain task
//!                            │
//!                            no (drain task already running)
//!
//! drain task: loop { lock; pop or (mark idle; return); unlock; run job }
//! ```
//!
//! Emptiness check and idle marking share one critical section, so a job
//! pushed concurrently with the last pop is never stranded.

use crate::error::ArenaError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::error;

/// Spawns blocking work on a tokio runtime.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    handle: Handle,
}

impl Dispatcher {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// [`ArenaError::Closed`] when called outside a tokio runtime.
    pub fn current() -> Result<Self, ArenaError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| ArenaError::Closed)
    }

    /// Runs `job` on the blocking pool. The result is not awaited.
    pub fn spawn_blocking<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        drop(self.handle.spawn_blocking(job));
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct ChainState {
    jobs: VecDeque<Job>,
    running: bool,
}

/// FIFO job queue drained by at most one blocking task at a time.
#[derive(Clone)]
pub struct TaskChain {
    dispatcher: Dispatcher,
    state: Arc<Mutex<ChainState>>,
}

impl TaskChain {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            state: Arc::new(Mutex::new(ChainState::default())),
        }
    }

    /// Queues `job` behind everything pushed before it.
    pub fn push<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let start = {
            let mut state = self.state.lock();
            state.jobs.push_back(Box::new(job));
            !std::mem::replace(&mut state.running, true)
        };
        if start {
            let state = Arc::clone(&self.state);
            self.dispatcher.spawn_blocking(move || drain(&state));
        }
    }

    /// Returns `true` when no drain task is alive.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.state.lock().running
    }
}

impl std::fmt::Debug for TaskChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskChain")
            .field("queued", &state.jobs.len())
            .field("running", &state.running)
            .finish()
    }
}

fn drain(state: &Mutex<ChainState>) {
    loop {
        let job = {
            let mut guard = state.lock();
            match guard.jobs.pop_front() {
                Some(job) => job,
                None => {
                    guard.running = false;
                    return;
                }
            }
        };
        // A panicking job must not wedge the chain in the running state.
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("Queued job panicked; continuing with the next one");
        }
    }
}
