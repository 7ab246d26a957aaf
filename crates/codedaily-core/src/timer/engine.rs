//! Timer engine implementation.
//!
//! The engine owns at most one live countdown. Each countdown is backed by a
//! repeating task obtained from a [`TickScheduler`]; the task's ticks come
//! back through [`TimerEngine::tick`] tagged with the countdown's handle.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle        (stop, or time_left reached zero)
//! ```
//!
//! Pausing is `stop()`, resuming is `start(time_left())`. Nothing advances
//! while stopped, so a pause/resume cycle neither loses nor gains time.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(ManualScheduler::new());
//! let handle = engine.start(600)?;
//! // For every tick delivered by the scheduler:
//! engine.tick(handle); // Some(TickOutcome::Completed) once, at zero
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::scheduler::TickScheduler;
use crate::error::TimerError;

/// Cadence of a running countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one countdown. A new handle is minted by every `start`, so
/// ticks left over from an earlier countdown never match the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a tick that belonged to the live countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second elapsed; carries the new remaining time.
    Advanced(u64),
    /// Remaining time reached zero. The engine has already stopped itself.
    Completed,
}

struct Countdown<T> {
    handle: TimerHandle,
    task: T,
}

/// Core countdown engine.
pub struct TimerEngine<S: TickScheduler> {
    scheduler: S,
    active: Option<Countdown<S::Task>>,
    time_left: u64,
    next_id: u64,
    period: Duration,
}

impl<S: TickScheduler> TimerEngine<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_period(scheduler, TICK_PERIOD)
    }

    pub fn with_period(scheduler: S, period: Duration) -> Self {
        Self {
            scheduler,
            active: None,
            time_left: 0,
            next_id: 1,
            period,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.active.as_ref().map(|c| c.handle)
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown from `time_left` seconds.
    ///
    /// # Errors
    /// Returns [`TimerError::AlreadyRunning`] if a countdown is live; the
    /// caller must `stop()` it first.
    pub fn start(&mut self, time_left: u64) -> Result<TimerHandle, TimerError> {
        if let Some(current) = &self.active {
            return Err(TimerError::AlreadyRunning(current.handle.raw()));
        }
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.time_left = time_left;
        let task = self.scheduler.spawn(handle, self.period);
        self.active = Some(Countdown { handle, task });
        tracing::debug!(%handle, time_left, "countdown started");
        Ok(handle)
    }

    /// Cancel the live countdown, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(Countdown { handle, task }) => {
                self.scheduler.cancel(task);
                tracing::debug!(%handle, time_left = self.time_left, "countdown stopped");
                true
            }
            None => false,
        }
    }

    /// Advance the countdown addressed by `handle` by one second.
    ///
    /// Returns `None` for ticks that do not belong to the live countdown.
    pub fn tick(&mut self, handle: TimerHandle) -> Option<TickOutcome> {
        if self.handle() != Some(handle) {
            tracing::trace!(%handle, "ignoring stale tick");
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.stop();
            return Some(TickOutcome::Completed);
        }
        Some(TickOutcome::Advanced(self.time_left))
    }
}

impl<S: TickScheduler> Drop for TimerEngine<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: TickScheduler> fmt::Debug for TimerEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("handle", &self.handle())
            .field("time_left", &self.time_left)
            .field("period", &self.period)
            .finish()
    }
}
