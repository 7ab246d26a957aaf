//! Sources of periodic ticks for the [`TimerEngine`](super::TimerEngine).
//!
//! The engine asks its scheduler for one repeating task per countdown and
//! cancels it on stop. Ticks are delivered out of band, tagged with the
//! countdown's handle, and fed back through `TimerEngine::tick`.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::engine::TimerHandle;

pub trait TickScheduler {
    /// Owned token for one repeating task.
    type Task;

    /// Begin delivering a tick for `handle` every `period`, first one a full
    /// period from now.
    fn spawn(&mut self, handle: TimerHandle, period: Duration) -> Self::Task;

    /// Stop the task. No tick for its handle may be produced afterwards.
    fn cancel(&mut self, task: Self::Task);
}

/// Scheduler that never ticks by itself; the caller drives
/// `TimerEngine::tick` directly. Tracks which tasks are live so tests can
/// check that no countdown outlives its session.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    live: BTreeSet<TimerHandle>,
    spawned: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_tasks(&self) -> usize {
        self.live.len()
    }

    pub fn spawned_total(&self) -> usize {
        self.spawned
    }
}

impl TickScheduler for ManualScheduler {
    type Task = TimerHandle;

    fn spawn(&mut self, handle: TimerHandle, _period: Duration) -> TimerHandle {
        self.live.insert(handle);
        self.spawned += 1;
        handle
    }

    fn cancel(&mut self, task: TimerHandle) {
        self.live.remove(&task);
    }
}

/// Runs each countdown as a `tokio` interval task that posts ticks into the
/// application's event queue.
///
/// `spawn` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler<E> {
    tx: UnboundedSender<E>,
}

impl<E> TokioScheduler<E> {
    pub fn new(tx: UnboundedSender<E>) -> Self {
        Self { tx }
    }
}

impl<E> TickScheduler for TokioScheduler<E>
where
    E: From<TimerHandle> + Send + 'static,
{
    type Task = JoinHandle<()>;

    fn spawn(&mut self, handle: TimerHandle, period: Duration) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(E::from(handle)).is_err() {
                    tracing::debug!(%handle, "tick receiver dropped, stopping task");
                    break;
                }
            }
        })
    }

    fn cancel(&mut self, task: JoinHandle<()>) {
        task.abort();
    }
}
