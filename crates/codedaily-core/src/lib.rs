//! # Code Daily Core Library
//!
//! This library provides the core logic of the Code Daily focus timer: name a
//! task, commit to a duration, watch the countdown, collect a credit reward,
//! and unlock upgrades on the roadmap as credits accumulate. The CLI binary is
//! a thin terminal skin over the same library.
//!
//! ## Architecture
//!
//! - **View-State Machine**: [`FocusMachine`] owns the session and decides
//!   which view is shown and which actions are legal
//! - **Timer Engine**: [`TimerEngine`] keeps at most one countdown alive,
//!   driven by a [`TickScheduler`]
//! - **Unlock Rules**: pure functions over the credit balance in [`unlocks`]
//! - **Storage**: a key-value [`Store`] (SQLite or in-memory) for the profile
//!   and TOML-based [`Config`]

pub mod error;
pub mod events;
pub mod machine;
pub mod session;
pub mod snapshot;
pub mod storage;
pub mod timer;
pub mod unlocks;

pub use error::{ConfigError, CoreError, StoreError, TimerError};
pub use events::{Event, TickUpdate};
pub use machine::{Action, FocusMachine, Outcome, Rejection, REWARD_CREDITS};
pub use session::{SessionState, View};
pub use snapshot::{Screen, Snapshot};
pub use storage::{Config, Database, MemoryStore, Profile, ProfileKeys, Store};
pub use timer::{
    format_clock, ManualScheduler, TickOutcome, TickScheduler, TimerEngine, TimerHandle,
    TokioScheduler,
};
pub use unlocks::{DurationOption, Feature, DEEP_FOCUS_THRESHOLD, DURATIONS, FEATURES};
