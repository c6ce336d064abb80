//! Cooperative "run until stopped" driver.
//!
//! A [`StoppableLoop`] calls a step function back to back on one thread
//! until another thread asks it to stop. Stopping is a request: the step in
//! flight always completes, and the loop only notices the request at the top
//! of its next iteration. It then moves to [`LoopState::Stopped`] and runs
//! the pending stop callback, once, on its own thread.
//!
//! Lifecycle rules:
//!
//! - `stop` before `run` is honored. The loop is pre-stopped, the later `run`
//!   performs no steps and fires the callback.
//! - `run` on a loop that has already been run returns
//!   [`LoopError::AlreadyStarted`] and calls nothing.
//! - `stop` while a stop is pending replaces the callback. Only the last one
//!   stored before the loop notices runs; replaced callbacks are dropped.
//! - `stop` after the loop stopped returns `false` and drops the callback.

use std::{
    fmt, io,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
    thread::{self, JoinHandle},
};
use thiserror::Error;
use tracing::{debug, trace};

/// Invoked by the loop thread once the last step has returned.
pub type StopCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LoopState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl LoopState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoopError {
    #[error("loop was already started (currently {0:?})")]
    AlreadyStarted(LoopState),
}

struct Shared {
    state: AtomicU8,
    entered: AtomicBool,
    pending: Mutex<Option<StopCallback>>,
}

/// Handle to one loop. Clones share the same loop, so a clone can be moved to
/// whichever thread will call [`stop`](Self::stop).
#[derive(Clone)]
pub struct StoppableLoop {
    shared: Arc<Shared>,
}

impl StoppableLoop {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(LoopState::Idle as u8),
                entered: AtomicBool::new(false),
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> LoopState {
        LoopState::from_raw(self.shared.state.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    /// Calls `step` repeatedly on the current thread until a stop request is
    /// observed. Pacing, if any, is up to `step`.
    pub fn run<F: FnMut()>(&self, mut step: F) -> Result<(), LoopError> {
        if self.shared.entered.swap(true, Ordering::SeqCst) {
            return Err(LoopError::AlreadyStarted(self.state()));
        }

        // Only a pre-start stop can have moved the state off Idle.
        let started = self
            .shared
            .state
            .compare_exchange(
                LoopState::Idle as u8,
                LoopState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();

        let mut steps: u64 = 0;
        if started {
            debug!("loop running");
            while self.shared.state.load(Ordering::SeqCst) == LoopState::Running as u8 {
                step();
                steps += 1;
            }
        } else {
            debug!("loop was stopped before it started");
        }

        self.finish(steps);
        Ok(())
    }

    /// Moves the loop onto its own named thread.
    pub fn spawn<F>(&self, name: &str, step: F) -> io::Result<JoinHandle<Result<(), LoopError>>>
    where
        F: FnMut() + Send + 'static,
    {
        let this = self.clone();
        thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || this.run(step))
    }

    /// Requests termination without waiting for it.
    ///
    /// Returns `false` if the loop had already stopped, in which case
    /// `on_stopped` is dropped without being called. Passing `None` clears a
    /// callback stored by an earlier call.
    pub fn stop(&self, on_stopped: Option<StopCallback>) -> bool {
        let mut pending = self.lock_pending();
        match self.state() {
            LoopState::Stopped => false,
            state => {
                if pending.is_some() {
                    trace!("replacing pending stop callback");
                }
                *pending = on_stopped;
                if state != LoopState::Stopping {
                    self.shared
                        .state
                        .store(LoopState::Stopping as u8, Ordering::SeqCst);
                    debug!(from = ?state, "stop requested");
                }
                true
            }
        }
    }

    fn finish(&self, steps: u64) {
        let callback = {
            let mut pending = self.lock_pending();
            self.shared
                .state
                .store(LoopState::Stopped as u8, Ordering::SeqCst);
            pending.take()
        };
        debug!(steps, "loop stopped");

        if let Some(callback) = callback {
            callback();
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<StopCallback>> {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StoppableLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoppableLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoppableLoop")
            .field("state", &self.state())
            .finish()
    }
}
