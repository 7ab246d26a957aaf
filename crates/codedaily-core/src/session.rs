//! In-memory session model.
//!
//! One [`SessionState`] exists per application instance. It is owned by the
//! [`FocusMachine`](crate::machine::FocusMachine) and only mutated through its
//! transitions and the timer engine's ticks.

use serde::{Deserialize, Serialize};

/// Seconds preselected on the Input screen before the user picks anything.
pub const DEFAULT_DURATION_SECS: u64 = 600;

/// The five mutually-exclusive screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Onboarding,
    Input,
    Timer,
    Completed,
    Roadmap,
}

impl View {
    /// Views reachable through an explicit navigate request.
    pub fn is_navigable(self) -> bool {
        matches!(self, View::Input | View::Roadmap)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            View::Onboarding => "onboarding",
            View::Input => "input",
            View::Timer => "timer",
            View::Completed => "completed",
            View::Roadmap => "roadmap",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub view: View,
    /// Empty means not onboarded.
    pub username: String,
    pub credits: u64,
    /// Empty when no session is active.
    pub task_name: String,
    pub selected_duration: u64,
    /// Committed duration of the current or just-finished session.
    pub duration: u64,
    pub time_left: u64,
    pub is_timer_active: bool,
}

impl SessionState {
    /// State as loaded at startup from the persisted `username` and `credits`.
    pub fn restored(username: String, credits: u64) -> Self {
        let view = if username.is_empty() {
            View::Onboarding
        } else {
            View::Input
        };
        Self {
            view,
            username,
            credits,
            task_name: String::new(),
            selected_duration: DEFAULT_DURATION_SECS,
            duration: DEFAULT_DURATION_SECS,
            time_left: DEFAULT_DURATION_SECS,
            is_timer_active: false,
        }
    }

    pub fn is_onboarded(&self) -> bool {
        !self.username.is_empty()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::restored(String::new(), 0)
    }
}
