use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::View;

/// Every accepted transition produces an Event.
/// The presentation layer re-renders the whole view when one arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SignedIn {
        username: String,
        at: DateTime<Utc>,
    },
    SignedOut {
        at: DateTime<Utc>,
    },
    ViewChanged {
        from: View,
        to: View,
        at: DateTime<Utc>,
    },
    DurationSelected {
        seconds: u64,
        at: DateTime<Utc>,
    },
    SessionStarted {
        task_name: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        time_left: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        time_left: u64,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        task_name: String,
        time_left: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        task_name: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    RewardCollected {
        amount: u64,
        credits: u64,
        at: DateTime<Utc>,
    },
}

/// Per-second countdown update, published separately from [`Event`] so the
/// presentation layer can refresh the clock without a full view switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickUpdate {
    pub time_left: u64,
    /// `MM:SS`
    pub clock: String,
    /// 0.0 ..= 1.0
    pub progress: f64,
}
