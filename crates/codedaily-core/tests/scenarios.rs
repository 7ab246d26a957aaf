//! End-to-end scenarios through the view-state machine.

use codedaily_core::{
    Action, FocusMachine, ManualScheduler, MemoryStore, Profile, ProfileKeys, Rejection,
    TickOutcome, View,
};

type Machine = FocusMachine<MemoryStore, ManualScheduler>;

fn machine(store: MemoryStore) -> Machine {
    FocusMachine::new(Profile::new(store, ProfileKeys::default()), ManualScheduler::new())
}

fn signed_in_with_credits(credits: u64) -> Machine {
    let credits = credits.to_string();
    machine(MemoryStore::with_values([
        ("code_daily_username", "Ada"),
        ("code_daily_credits", credits.as_str()),
    ]))
}

fn tick_n(m: &mut Machine, n: u64) -> Vec<TickOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..n {
        let handle = m.timer_handle().expect("countdown should be live");
        outcomes.extend(m.on_tick(handle));
    }
    outcomes
}

#[test]
fn scenario_a_fresh_store_onboards() {
    let mut m = machine(MemoryStore::new());
    assert_eq!(m.view(), View::Onboarding);

    m.submit_name("Ada").unwrap();
    assert_eq!(m.view(), View::Input);
    assert_eq!(m.profile().store().raw("code_daily_username"), Some("Ada"));
}

#[test]
fn scenario_b_locked_duration_rejected() {
    let mut m = signed_in_with_credits(0);
    assert_eq!(m.pick_duration(1500), Err(Rejection::DurationLocked));
    assert_eq!(m.state().selected_duration, 600);
    m.pick_duration(600).unwrap();
    assert_eq!(m.state().selected_duration, 600);
}

#[test]
fn scenario_c_countdown_completes_after_duration_ticks() {
    let mut m = signed_in_with_credits(0);
    m.submit_task("Refactor").unwrap();
    assert_eq!(m.view(), View::Timer);
    assert_eq!(m.state().duration, 600);
    assert_eq!(m.state().time_left, 600);

    let outcomes = tick_n(&mut m, 600);
    assert_eq!(m.view(), View::Completed);
    assert_eq!(m.state().time_left, 0);
    assert!(!m.state().is_timer_active);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == TickOutcome::Completed)
            .count(),
        1
    );
    assert_eq!(outcomes.last(), Some(&TickOutcome::Completed));
    assert!(m.timer_handle().is_none());
}

#[test]
fn scenario_d_collect_reward() {
    let mut m = signed_in_with_credits(0);
    m.submit_task("Refactor").unwrap();
    tick_n(&mut m, 600);
    assert_eq!(m.state().task_name, "Refactor");

    m.collect_reward().unwrap();
    assert_eq!(m.state().credits, 10);
    assert_eq!(m.view(), View::Input);
    assert_eq!(m.state().task_name, "");
    assert_eq!(m.profile().store().raw("code_daily_credits"), Some("10"));
}

#[test]
fn scenario_e_pause_then_navigate_leaves_no_countdown() {
    let mut m = signed_in_with_credits(0);
    m.submit_task("Refactor").unwrap();
    tick_n(&mut m, 300);
    assert_eq!(m.state().time_left, 300);

    m.toggle_pause().unwrap();
    assert!(!m.state().is_timer_active);
    assert!(m.timer_handle().is_none());

    m.navigate(View::Input).unwrap();
    assert_eq!(m.view(), View::Input);
    assert!(m.timer_handle().is_none());
    assert_eq!(m.engine().scheduler().live_tasks(), 0);
    assert_eq!(m.state().task_name, "");
}

#[test]
fn scenario_e_navigate_from_running_timer_cancels() {
    let mut m = signed_in_with_credits(0);
    m.submit_task("Refactor").unwrap();
    let handle = m.timer_handle().unwrap();

    m.navigate(View::Roadmap).unwrap();
    assert_eq!(m.view(), View::Roadmap);
    assert!(!m.state().is_timer_active);
    assert_eq!(m.engine().scheduler().live_tasks(), 0);
    // a tick already queued from the old countdown is discarded
    assert_eq!(m.on_tick(handle), None);
    assert_eq!(m.view(), View::Roadmap);
}

#[test]
fn scenario_f_deep_focus_threshold() {
    let mut m = signed_in_with_credits(499);
    assert_eq!(m.pick_duration(1500), Err(Rejection::DurationLocked));

    let mut m = signed_in_with_credits(500);
    m.pick_duration(1500).unwrap();
    assert_eq!(m.state().selected_duration, 1500);
    m.pick_duration(3600).unwrap();
    m.submit_task("Long haul").unwrap();
    assert_eq!(m.state().duration, 3600);
}

#[test]
fn reward_per_session_accumulates() {
    let mut m = signed_in_with_credits(490);
    for _ in 0..2 {
        m.dispatch(Action::SubmitTask("Write tests".into())).unwrap();
        tick_n(&mut m, 600);
        m.dispatch(Action::CollectReward).unwrap();
    }
    assert_eq!(m.state().credits, 510);
    // crossing the threshold opens locked durations immediately
    m.pick_duration(1500).unwrap();
}

#[test]
fn selected_duration_survives_sessions() {
    let mut m = signed_in_with_credits(500);
    m.pick_duration(1500).unwrap();
    m.submit_task("One").unwrap();
    m.cancel_session().unwrap();
    assert_eq!(m.state().selected_duration, 1500);
}

#[test]
fn restart_restores_profile() {
    let mut m = machine(MemoryStore::new());
    m.submit_name("Grace").unwrap();
    m.submit_task("Ship it").unwrap();
    tick_n(&mut m, 600);
    m.collect_reward().unwrap();

    let store = m.profile().store().clone();
    let restarted = machine(store);
    assert_eq!(restarted.view(), View::Input);
    assert_eq!(restarted.state().username, "Grace");
    assert_eq!(restarted.state().credits, 10);
}

#[test]
fn sign_out_returns_to_onboarding_and_keeps_credits() {
    let mut m = signed_in_with_credits(40);
    m.navigate(View::Roadmap).unwrap();
    m.sign_out();
    assert_eq!(m.view(), View::Onboarding);
    assert_eq!(m.state().username, "");
    assert_eq!(m.profile().store().raw("code_daily_credits"), Some("40"));

    let restarted = machine(m.profile().store().clone());
    assert_eq!(restarted.view(), View::Onboarding);
}
