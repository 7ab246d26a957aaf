//! View-state machine.
//!
//! [`FocusMachine`] is the application root: it owns the [`SessionState`],
//! the [`TimerEngine`] and the persisted [`Profile`], applies user actions and
//! timer ticks, and publishes the results on two channels:
//!
//! - transitions ([`Event`]), for full re-renders
//! - ticks ([`TickUpdate`]), for the once-a-second clock refresh
//!
//! ## Transitions
//!
//! ```text
//! Onboarding --submit name--> Input <--navigate--> Roadmap
//! Input --submit task--> Timer --expiry--> Completed --collect--> Input
//! Timer --cancel / navigate--> Input | Roadmap
//! any --sign out--> Onboarding
//! ```
//!
//! Every view change goes through one private `enter_view`, which stops the
//! countdown whenever the Timer view is left. Rejected actions return a
//! [`Rejection`] and leave the state untouched.

use chrono::Utc;
use tokio::sync::broadcast;

use crate::events::{Event, TickUpdate};
use crate::session::{SessionState, View};
use crate::snapshot::Snapshot;
use crate::storage::{Profile, Store};
use crate::timer::{format_clock, progress, TickOutcome, TickScheduler, TimerEngine, TimerHandle};
use crate::unlocks::{find_duration, is_duration_selectable};

/// Credits granted for each completed session.
pub const REWARD_CREDITS: u64 = 10;

const CHANNEL_CAPACITY: usize = 64;

/// A user action from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SubmitName(String),
    Navigate(View),
    PickDuration(u64),
    SubmitTask(String),
    TogglePause,
    CancelSession,
    CollectReward,
    SignOut,
}

/// Why an action was ignored. State is unchanged whenever one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("name is empty")]
    EmptyName,
    #[error("task name is empty")]
    EmptyTaskName,
    #[error("duration is locked until more credits are earned")]
    DurationLocked,
    #[error("no such duration option")]
    UnknownDuration,
    #[error("not available from the {0} view")]
    WrongView(View),
    #[error("cannot navigate to the {0} view")]
    NotNavigable(View),
}

pub type Outcome = Result<(), Rejection>;

pub struct FocusMachine<St: Store, S: TickScheduler> {
    state: SessionState,
    engine: TimerEngine<S>,
    profile: Profile<St>,
    transitions: broadcast::Sender<Event>,
    ticks: broadcast::Sender<TickUpdate>,
}

impl<St: Store, S: TickScheduler> FocusMachine<St, S> {
    /// App start: restore `username` and `credits` and pick the first view.
    pub fn new(profile: Profile<St>, scheduler: S) -> Self {
        Self::with_engine(profile, TimerEngine::new(scheduler))
    }

    pub fn with_engine(profile: Profile<St>, engine: TimerEngine<S>) -> Self {
        let state = SessionState::restored(profile.load_username(), profile.load_credits());
        tracing::info!(view = %state.view, credits = state.credits, "session restored");
        let (transitions, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (ticks, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            state,
            engine,
            profile,
            transitions,
            ticks,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub fn engine(&self) -> &TimerEngine<S> {
        &self.engine
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.engine.handle()
    }

    pub fn profile(&self) -> &Profile<St> {
        &self.profile
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.transitions.subscribe()
    }

    pub fn subscribe_ticks(&self) -> broadcast::Receiver<TickUpdate> {
        self.ticks.subscribe()
    }

    // ── Actions ──────────────────────────────────────────────────────

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let outcome = match action {
            Action::SubmitName(name) => self.submit_name(&name),
            Action::Navigate(target) => self.navigate(target),
            Action::PickDuration(seconds) => self.pick_duration(seconds),
            Action::SubmitTask(task) => self.submit_task(&task),
            Action::TogglePause => self.toggle_pause(),
            Action::CancelSession => self.cancel_session(),
            Action::CollectReward => self.collect_reward(),
            Action::SignOut => {
                self.sign_out();
                Ok(())
            }
        };
        if let Err(rejection) = outcome {
            tracing::debug!(%rejection, view = %self.state.view, "action rejected");
        }
        outcome
    }

    pub fn submit_name(&mut self, input: &str) -> Outcome {
        self.require_view(View::Onboarding)?;
        let name = input.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        self.state.username = name.to_string();
        self.profile.save_username(name);
        self.emit(Event::SignedIn {
            username: name.to_string(),
            at: Utc::now(),
        });
        self.enter_view(View::Input);
        Ok(())
    }

    /// Explicit navigation. Leaving the Timer view this way abandons the
    /// session just like [`cancel_session`](Self::cancel_session).
    pub fn navigate(&mut self, target: View) -> Outcome {
        if !target.is_navigable() {
            return Err(Rejection::NotNavigable(target));
        }
        if !self.state.is_onboarded() {
            return Err(Rejection::WrongView(self.state.view));
        }
        self.enter_view(target);
        Ok(())
    }

    pub fn pick_duration(&mut self, seconds: u64) -> Outcome {
        self.require_view(View::Input)?;
        let option = find_duration(seconds).ok_or(Rejection::UnknownDuration)?;
        if !is_duration_selectable(option, self.state.credits) {
            return Err(Rejection::DurationLocked);
        }
        self.state.selected_duration = seconds;
        self.emit(Event::DurationSelected {
            seconds,
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn submit_task(&mut self, input: &str) -> Outcome {
        self.require_view(View::Input)?;
        let task = input.trim();
        if task.is_empty() {
            return Err(Rejection::EmptyTaskName);
        }
        self.state.task_name = task.to_string();
        self.state.duration = self.state.selected_duration;
        self.state.time_left = self.state.selected_duration;
        tracing::info!(task, duration = self.state.duration, "session started");
        self.emit(Event::SessionStarted {
            task_name: task.to_string(),
            duration_secs: self.state.duration,
            at: Utc::now(),
        });
        self.enter_view(View::Timer);
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Outcome {
        self.require_view(View::Timer)?;
        if self.state.is_timer_active {
            self.engine.stop();
            self.state.is_timer_active = false;
            self.emit(Event::SessionPaused {
                time_left: self.state.time_left,
                at: Utc::now(),
            });
        } else {
            self.start_countdown();
            self.emit(Event::SessionResumed {
                time_left: self.state.time_left,
                at: Utc::now(),
            });
        }
        self.check_invariants();
        Ok(())
    }

    pub fn cancel_session(&mut self) -> Outcome {
        self.require_view(View::Timer)?;
        self.enter_view(View::Input);
        Ok(())
    }

    pub fn collect_reward(&mut self) -> Outcome {
        self.require_view(View::Completed)?;
        self.state.credits = self.state.credits.saturating_add(REWARD_CREDITS);
        self.profile.save_credits(self.state.credits);
        tracing::info!(credits = self.state.credits, "reward collected");
        self.emit(Event::RewardCollected {
            amount: REWARD_CREDITS,
            credits: self.state.credits,
            at: Utc::now(),
        });
        self.state.task_name.clear();
        self.enter_view(View::Input);
        Ok(())
    }

    /// Replace the signed-in user with `input`.
    ///
    /// The name is checked before anything is signed out, so a rejected
    /// switch keeps the current user.
    pub fn switch_user(&mut self, input: &str) -> Outcome {
        if input.trim().is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.state.is_onboarded() {
            self.sign_out();
        }
        self.submit_name(input)
    }

    /// Always accepted, from any view.
    pub fn sign_out(&mut self) {
        self.state.username.clear();
        self.profile.clear_username();
        self.emit(Event::SignedOut { at: Utc::now() });
        self.enter_view(View::Onboarding);
    }

    // ── Timer signals ────────────────────────────────────────────────

    /// Feed one tick from the scheduler. Stale ticks are ignored.
    pub fn on_tick(&mut self, handle: TimerHandle) -> Option<TickOutcome> {
        let outcome = self.engine.tick(handle)?;
        self.state.time_left = self.engine.time_left();
        let _ = self.ticks.send(TickUpdate {
            time_left: self.state.time_left,
            clock: format_clock(self.state.time_left),
            progress: progress(self.state.duration, self.state.time_left),
        });
        if outcome == TickOutcome::Completed {
            self.state.is_timer_active = false;
            tracing::info!(task = %self.state.task_name, "session completed");
            self.emit(Event::SessionCompleted {
                task_name: self.state.task_name.clone(),
                duration_secs: self.state.duration,
                at: Utc::now(),
            });
            self.enter_view(View::Completed);
        }
        Some(outcome)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require_view(&self, expected: View) -> Outcome {
        if self.state.view == expected {
            Ok(())
        } else {
            Err(Rejection::WrongView(self.state.view))
        }
    }

    /// The only place `view` changes.
    fn enter_view(&mut self, to: View) {
        let from = self.state.view;

        if from == View::Timer && to != View::Timer {
            self.engine.stop();
            self.state.is_timer_active = false;
            if to != View::Completed {
                let task_name = std::mem::take(&mut self.state.task_name);
                tracing::info!(task = %task_name, time_left = self.state.time_left, "session cancelled");
                self.emit(Event::SessionCancelled {
                    task_name,
                    time_left: self.state.time_left,
                    at: Utc::now(),
                });
            }
        }
        if from == View::Completed && to != View::Completed {
            // uncollected rewards are forfeited with the session
            self.state.task_name.clear();
        }

        self.state.view = to;
        if to == View::Timer {
            self.start_countdown();
        }

        tracing::debug!(%from, %to, "view changed");
        self.emit(Event::ViewChanged {
            from,
            to,
            at: Utc::now(),
        });
        self.check_invariants();
    }

    fn start_countdown(&mut self) {
        let orphan = self.engine.stop();
        debug_assert!(!orphan, "a countdown was still live when starting another");
        match self.engine.start(self.state.time_left) {
            Ok(_) => self.state.is_timer_active = true,
            Err(e) => tracing::error!(error = %e, "countdown refused to start"),
        }
    }

    fn emit(&self, event: Event) {
        // no subscribers is fine
        let _ = self.transitions.send(event);
    }

    fn check_invariants(&self) {
        let s = &self.state;
        debug_assert!(s.time_left <= s.duration, "time_left exceeds duration");
        debug_assert!(
            !s.is_timer_active || (self.engine.is_running() && s.view == View::Timer),
            "active timer outside the Timer view"
        );
        debug_assert!(
            s.view == View::Timer || !self.engine.is_running(),
            "countdown left running outside the Timer view"
        );
        debug_assert_eq!(s.is_timer_active, self.engine.is_running());
    }
}

impl<St: Store, S: TickScheduler> std::fmt::Debug for FocusMachine<St, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusMachine")
            .field("state", &self.state)
            .field("engine", &self.engine)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, ProfileKeys};
    use crate::timer::ManualScheduler;

    type TestMachine = FocusMachine<MemoryStore, ManualScheduler>;

    fn machine_with(store: MemoryStore) -> TestMachine {
        FocusMachine::new(Profile::new(store, ProfileKeys::default()), ManualScheduler::new())
    }

    fn signed_in(credits: &str) -> TestMachine {
        machine_with(MemoryStore::with_values([
            ("code_daily_username", "Ada"),
            ("code_daily_credits", credits),
        ]))
    }

    fn run_down(m: &mut TestMachine) {
        while let Some(handle) = m.timer_handle() {
            m.on_tick(handle);
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut m = machine_with(MemoryStore::new());
        assert_eq!(m.submit_name("   "), Err(Rejection::EmptyName));
        assert_eq!(m.view(), View::Onboarding);
    }

    #[test]
    fn name_is_trimmed_and_persisted() {
        let mut m = machine_with(MemoryStore::new());
        m.submit_name("  Ada ").unwrap();
        assert_eq!(m.state().username, "Ada");
        assert_eq!(m.profile().store().raw("code_daily_username"), Some("Ada"));
    }

    #[test]
    fn navigation_requires_onboarding() {
        let mut m = machine_with(MemoryStore::new());
        assert_eq!(
            m.navigate(View::Roadmap),
            Err(Rejection::WrongView(View::Onboarding))
        );
    }

    #[test]
    fn cannot_navigate_into_timer_or_completed() {
        let mut m = signed_in("0");
        assert_eq!(
            m.navigate(View::Timer),
            Err(Rejection::NotNavigable(View::Timer))
        );
        assert_eq!(
            m.navigate(View::Completed),
            Err(Rejection::NotNavigable(View::Completed))
        );
        assert_eq!(m.engine().scheduler().live_tasks(), 0);
    }

    #[test]
    fn unknown_duration_is_rejected() {
        let mut m = signed_in("0");
        assert_eq!(m.pick_duration(42), Err(Rejection::UnknownDuration));
    }

    #[test]
    fn empty_task_is_rejected() {
        let mut m = signed_in("0");
        assert_eq!(m.submit_task(" \t"), Err(Rejection::EmptyTaskName));
        assert_eq!(m.view(), View::Input);
        assert!(m.timer_handle().is_none());
    }

    #[test]
    fn submit_task_starts_exactly_one_countdown() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        assert_eq!(m.view(), View::Timer);
        assert!(m.state().is_timer_active);
        assert_eq!(m.engine().scheduler().live_tasks(), 1);
        assert_eq!(
            m.submit_task("Another"),
            Err(Rejection::WrongView(View::Timer))
        );
        assert_eq!(m.engine().scheduler().spawned_total(), 1);
    }

    #[test]
    fn pause_and_resume_keep_time() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        let first = m.timer_handle().unwrap();
        m.on_tick(first);
        m.toggle_pause().unwrap();
        assert!(!m.state().is_timer_active);
        assert!(m.timer_handle().is_none());
        assert_eq!(m.on_tick(first), None);
        assert_eq!(m.state().time_left, 599);

        m.toggle_pause().unwrap();
        let second = m.timer_handle().unwrap();
        assert_ne!(first, second);
        m.on_tick(second);
        assert_eq!(m.state().time_left, 598);
    }

    #[test]
    fn cancel_discards_session() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        m.cancel_session().unwrap();
        assert_eq!(m.view(), View::Input);
        assert_eq!(m.state().task_name, "");
        assert!(!m.state().is_timer_active);
        assert_eq!(m.engine().scheduler().live_tasks(), 0);
        assert_eq!(m.cancel_session(), Err(Rejection::WrongView(View::Input)));
    }

    #[test]
    fn completion_then_single_reward() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        run_down(&mut m);
        assert_eq!(m.view(), View::Completed);
        assert_eq!(m.state().task_name, "Refactor");

        m.collect_reward().unwrap();
        assert_eq!(m.state().credits, 10);
        assert_eq!(
            m.collect_reward(),
            Err(Rejection::WrongView(View::Input))
        );
        assert_eq!(m.state().credits, 10);
    }

    #[test]
    fn leaving_completed_forfeits_reward() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        run_down(&mut m);
        m.navigate(View::Roadmap).unwrap();
        assert_eq!(m.state().task_name, "");
        assert_eq!(m.state().credits, 0);
    }

    #[test]
    fn sign_out_from_completed_forfeits_reward() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        run_down(&mut m);
        assert_eq!(m.view(), View::Completed);

        m.sign_out();
        assert_eq!(m.view(), View::Onboarding);
        assert_eq!(m.state().task_name, "");
        assert_eq!(m.state().credits, 0);
        assert_eq!(m.profile().store().raw("code_daily_credits"), Some("0"));

        m.submit_name("Ada").unwrap();
        assert_eq!(m.collect_reward(), Err(Rejection::WrongView(View::Input)));
        assert_eq!(m.state().credits, 0);
    }

    #[test]
    fn switch_user_replaces_name() {
        let mut m = signed_in("30");
        m.switch_user("  Grace ").unwrap();
        assert_eq!(m.view(), View::Input);
        assert_eq!(m.state().username, "Grace");
        assert_eq!(m.state().credits, 30);
        assert_eq!(m.profile().store().raw("code_daily_username"), Some("Grace"));
    }

    #[test]
    fn blank_switch_user_keeps_current_user() {
        let mut m = signed_in("0");
        assert_eq!(m.switch_user("   "), Err(Rejection::EmptyName));
        assert_eq!(m.view(), View::Input);
        assert_eq!(m.state().username, "Ada");
        assert_eq!(m.profile().store().raw("code_daily_username"), Some("Ada"));
    }

    #[test]
    fn sign_out_from_timer_stops_countdown() {
        let mut m = signed_in("0");
        m.submit_task("Refactor").unwrap();
        m.sign_out();
        assert_eq!(m.view(), View::Onboarding);
        assert!(m.timer_handle().is_none());
        assert_eq!(m.state().task_name, "");
        assert_eq!(m.profile().store().raw("code_daily_username"), None);
    }

    #[test]
    fn transitions_and_ticks_use_separate_channels() {
        let mut m = signed_in("0");
        let mut events = m.subscribe();
        let mut ticks = m.subscribe_ticks();

        m.submit_task("Refactor").unwrap();
        let handle = m.timer_handle().unwrap();
        m.on_tick(handle);

        assert!(matches!(events.try_recv(), Ok(Event::SessionStarted { .. })));
        assert!(matches!(
            events.try_recv(),
            Ok(Event::ViewChanged { from: View::Input, to: View::Timer, .. })
        ));
        assert!(events.try_recv().is_err());

        let tick = ticks.try_recv().unwrap();
        assert_eq!(tick.time_left, 599);
        assert_eq!(tick.clock, "09:59");
    }

    #[test]
    fn dispatch_routes_actions() {
        let mut m = machine_with(MemoryStore::new());
        m.dispatch(Action::SubmitName("Ada".into())).unwrap();
        m.dispatch(Action::Navigate(View::Roadmap)).unwrap();
        assert_eq!(m.view(), View::Roadmap);
        m.dispatch(Action::SignOut).unwrap();
        assert_eq!(m.view(), View::Onboarding);
    }
}
