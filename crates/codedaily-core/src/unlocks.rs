//! Duration and feature catalogs, and the rules deciding what is unlocked.
//!
//! Credits are never spent: crossing a feature's cost unlocks it for good.
//! Everything here is a pure function of the current credit balance.

use serde::Serialize;

/// Credits at which every locked duration becomes selectable.
pub const DEEP_FOCUS_THRESHOLD: u64 = 500;

/// Lowest progress shown on the roadmap bar so a new tier is still visible.
pub const MIN_TIER_PROGRESS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationOption {
    pub label: &'static str,
    pub seconds: u64,
    /// Requires the deep-focus unlock to select.
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cost: u64,
    pub icon: &'static str,
}

pub const DURATIONS: [DurationOption; 3] = [
    DurationOption { label: "10m", seconds: 600, locked: false },
    DurationOption { label: "25m", seconds: 1500, locked: true },
    DurationOption { label: "60m", seconds: 3600, locked: true },
];

/// Sorted by ascending cost.
pub const FEATURES: [Feature; 3] = [
    Feature {
        id: "deep-focus",
        title: "Deep Focus Mode",
        description: "Unlock 25m & 60m timer options.",
        cost: DEEP_FOCUS_THRESHOLD,
        icon: "⏱️",
    },
    Feature {
        id: "zen-audio",
        title: "Zen Audio",
        description: "Background ambient sounds.",
        cost: 1000,
        icon: "🎧",
    },
    Feature {
        id: "dark-mode",
        title: "Midnight Theme",
        description: "Dark aesthetic for night coding.",
        cost: 1500,
        icon: "🌙",
    },
];

pub fn find_duration(seconds: u64) -> Option<&'static DurationOption> {
    DURATIONS.iter().find(|d| d.seconds == seconds)
}

pub fn is_duration_selectable(option: &DurationOption, credits: u64) -> bool {
    !option.locked || credits >= DEEP_FOCUS_THRESHOLD
}

pub fn is_feature_unlocked(feature: &Feature, credits: u64) -> bool {
    credits >= feature.cost
}

pub fn selectable_durations(credits: u64) -> impl Iterator<Item = &'static DurationOption> {
    DURATIONS
        .iter()
        .filter(move |d| is_duration_selectable(d, credits))
}

pub fn unlocked_features(credits: u64) -> impl Iterator<Item = &'static Feature> {
    FEATURES.iter().filter(move |f| is_feature_unlocked(f, credits))
}

/// Cheapest feature not yet unlocked, or `None` at max level.
pub fn next_feature(credits: u64) -> Option<&'static Feature> {
    FEATURES
        .iter()
        .filter(|f| f.cost > credits)
        .min_by_key(|f| f.cost)
}

/// Fraction of the way from the last reached tier to the next one, in [0.05, 1].
pub fn roadmap_progress(credits: u64) -> f64 {
    let Some(next) = next_feature(credits) else {
        return 1.0;
    };
    let prev = FEATURES
        .iter()
        .filter(|f| f.cost <= credits)
        .map(|f| f.cost)
        .max()
        .unwrap_or(0);
    let span = (next.cost - prev) as f64;
    let fraction = (credits - prev) as f64 / span;
    fraction.max(MIN_TIER_PROGRESS)
}

/// Credits still missing before locked durations open up.
pub fn credits_to_deep_focus(credits: u64) -> Option<u64> {
    DEEP_FOCUS_THRESHOLD
        .checked_sub(credits)
        .filter(|remaining| *remaining > 0)
}

/// Credits still missing before the next feature unlocks.
pub fn credits_to_next(credits: u64) -> Option<u64> {
    next_feature(credits).map(|f| f.cost - credits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn locked_duration_opens_at_threshold() {
        let deep = find_duration(1500).unwrap();
        assert!(!is_duration_selectable(deep, 499));
        assert!(is_duration_selectable(deep, 500));
    }

    #[test]
    fn unlocked_duration_always_selectable() {
        let short = find_duration(600).unwrap();
        assert!(is_duration_selectable(short, 0));
    }

    #[test]
    fn unknown_duration_not_in_catalog() {
        assert!(find_duration(42).is_none());
    }

    #[test]
    fn next_feature_walks_tiers() {
        assert_eq!(next_feature(0).map(|f| f.id), Some("deep-focus"));
        assert_eq!(next_feature(500).map(|f| f.id), Some("zen-audio"));
        assert_eq!(next_feature(1499).map(|f| f.id), Some("dark-mode"));
        assert!(next_feature(1500).is_none());
    }

    #[test]
    fn progress_has_visible_floor() {
        assert_eq!(roadmap_progress(0), MIN_TIER_PROGRESS);
        assert_eq!(roadmap_progress(500), MIN_TIER_PROGRESS);
    }

    #[test]
    fn progress_within_tier() {
        assert!((roadmap_progress(250) - 0.5).abs() < f64::EPSILON);
        assert!((roadmap_progress(750) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_full_at_max_level() {
        assert_eq!(roadmap_progress(1500), 1.0);
        assert_eq!(roadmap_progress(9000), 1.0);
    }

    #[test]
    fn remaining_credit_hints() {
        assert_eq!(credits_to_deep_focus(120), Some(380));
        assert_eq!(credits_to_deep_focus(500), None);
        assert_eq!(credits_to_next(120), Some(380));
        assert_eq!(credits_to_next(1200), Some(300));
        assert_eq!(credits_to_next(2000), None);
    }

    proptest! {
        #[test]
        fn unlocks_are_monotonic(c1 in 0u64..3000, delta in 0u64..3000) {
            let c2 = c1 + delta;
            for f in unlocked_features(c1) {
                prop_assert!(is_feature_unlocked(f, c2));
            }
            for d in selectable_durations(c1) {
                prop_assert!(is_duration_selectable(d, c2));
            }
        }

        #[test]
        fn progress_stays_in_range(credits in 0u64..5000) {
            let p = roadmap_progress(credits);
            prop_assert!((MIN_TIER_PROGRESS..=1.0).contains(&p));
        }
    }
}
