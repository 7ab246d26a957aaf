//! Read-only view of the session for the presentation layer.

use serde::Serialize;

use crate::machine::REWARD_CREDITS;
use crate::session::{SessionState, View};
use crate::timer::{format_clock, progress};
use crate::unlocks::{
    credits_to_deep_focus, credits_to_next, is_duration_selectable, is_feature_unlocked,
    next_feature, roadmap_progress, Feature, DURATIONS, FEATURES,
};

/// Everything needed to draw the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub view: View,
    pub username: String,
    pub credits: u64,
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationChoice {
    pub label: &'static str,
    pub seconds: u64,
    pub locked: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStatus {
    #[serde(flatten)]
    pub feature: Feature,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Screen {
    Onboarding,
    Input {
        selected_duration: u64,
        durations: Vec<DurationChoice>,
        /// Credits missing before locked durations open, if any.
        credits_to_deep_focus: Option<u64>,
    },
    Timer {
        task_name: String,
        duration: u64,
        time_left: u64,
        clock: String,
        progress: f64,
        is_timer_active: bool,
    },
    Completed {
        task_name: String,
        reward: u64,
    },
    Roadmap {
        features: Vec<FeatureStatus>,
        next_feature: Option<Feature>,
        progress: f64,
        credits_to_next: Option<u64>,
    },
}

impl Snapshot {
    pub fn of(state: &SessionState) -> Self {
        let credits = state.credits;
        let screen = match state.view {
            View::Onboarding => Screen::Onboarding,
            View::Input => Screen::Input {
                selected_duration: state.selected_duration,
                durations: DURATIONS
                    .iter()
                    .map(|d| DurationChoice {
                        label: d.label,
                        seconds: d.seconds,
                        locked: !is_duration_selectable(d, credits),
                        selected: d.seconds == state.selected_duration,
                    })
                    .collect(),
                credits_to_deep_focus: credits_to_deep_focus(credits),
            },
            View::Timer => Screen::Timer {
                task_name: state.task_name.clone(),
                duration: state.duration,
                time_left: state.time_left,
                clock: format_clock(state.time_left),
                progress: progress(state.duration, state.time_left),
                is_timer_active: state.is_timer_active,
            },
            View::Completed => Screen::Completed {
                task_name: state.task_name.clone(),
                reward: REWARD_CREDITS,
            },
            View::Roadmap => Screen::Roadmap {
                features: FEATURES
                    .iter()
                    .map(|f| FeatureStatus {
                        feature: *f,
                        unlocked: is_feature_unlocked(f, credits),
                    })
                    .collect(),
                next_feature: next_feature(credits).copied(),
                progress: roadmap_progress(credits),
                credits_to_next: credits_to_next(credits),
            },
        };
        Self {
            view: state.view,
            username: state.username.clone(),
            credits,
            screen,
        }
    }
}
