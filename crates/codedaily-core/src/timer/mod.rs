mod clock;
mod engine;
mod scheduler;

pub use clock::{format_clock, progress};
pub use engine::{TickOutcome, TimerEngine, TimerHandle, TICK_PERIOD};
pub use scheduler::{ManualScheduler, TickScheduler, TokioScheduler};
