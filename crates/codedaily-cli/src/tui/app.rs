//! Presentation state for the terminal UI.
//!
//! Holds what the machine does not: the text being typed and the last
//! rejection notice. The view itself is always the machine's latest
//! [`Snapshot`], refreshed whenever a transition event arrives; the
//! countdown face is refreshed from the tick channel alone.

use codedaily_core::storage::UiConfig;
use codedaily_core::unlocks::{credits_to_deep_focus, DURATIONS};
use codedaily_core::{
    Action, Event, FocusMachine, Rejection, Screen, Snapshot, Store, TickScheduler, TickUpdate,
    View,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::broadcast::{self, error::TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct TuiApp {
    pub snapshot: Snapshot,
    /// Latest per-second update for the Timer view.
    pub tick: Option<TickUpdate>,
    pub input: String,
    pub notice: Option<String>,
    pub ui: UiConfig,
}

impl TuiApp {
    pub fn new(snapshot: Snapshot, ui: UiConfig) -> Self {
        Self {
            snapshot,
            tick: None,
            input: String::new(),
            notice: None,
            ui,
        }
    }

    /// Clock text and progress for the Timer view.
    pub fn timer_face(&self) -> Option<(String, f64)> {
        if let Some(t) = &self.tick {
            return Some((t.clock.clone(), t.progress));
        }
        match &self.snapshot.screen {
            Screen::Timer {
                clock, progress, ..
            } => Some((clock.clone(), *progress)),
            _ => None,
        }
    }

    pub fn handle_key<St: Store, S: TickScheduler>(
        &mut self,
        key: KeyEvent,
        machine: &mut FocusMachine<St, S>,
    ) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        let action = match (machine.view(), key.code) {
            (View::Onboarding | View::Input, KeyCode::Esc) => return Flow::Quit,
            (View::Onboarding | View::Input, KeyCode::Backspace) => {
                self.input.pop();
                None
            }
            (View::Onboarding, KeyCode::Enter) => Some(Action::SubmitName(self.input.clone())),
            (View::Input, KeyCode::Enter) => Some(Action::SubmitTask(self.input.clone())),
            (View::Input, KeyCode::Tab | KeyCode::Right) => {
                Some(Action::PickDuration(self.cycle_duration(machine, 1)))
            }
            (View::Input, KeyCode::BackTab | KeyCode::Left) => {
                Some(Action::PickDuration(self.cycle_duration(machine, DURATIONS.len() - 1)))
            }
            (View::Input, KeyCode::F(2)) => Some(Action::Navigate(View::Roadmap)),
            (View::Onboarding | View::Input, KeyCode::Char(c)) => {
                self.input.push(c);
                None
            }
            (View::Timer, KeyCode::Char(' ') | KeyCode::Char('p')) => Some(Action::TogglePause),
            (View::Timer, KeyCode::Esc | KeyCode::Char('x')) => Some(Action::CancelSession),
            (View::Timer | View::Completed, KeyCode::Char('r')) => {
                Some(Action::Navigate(View::Roadmap))
            }
            (View::Completed, KeyCode::Enter) => Some(Action::CollectReward),
            (View::Roadmap, KeyCode::Esc | KeyCode::Char('b')) => {
                Some(Action::Navigate(View::Input))
            }
            (View::Roadmap, KeyCode::Char('s')) => Some(Action::SignOut),
            (View::Roadmap | View::Completed | View::Timer, KeyCode::Char('q')) => {
                return Flow::Quit
            }
            _ => None,
        };

        if let Some(action) = action {
            let clears_input = matches!(action, Action::SubmitName(_) | Action::SubmitTask(_));
            match machine.dispatch(action) {
                Ok(()) => {
                    self.notice = None;
                    if clears_input {
                        self.input.clear();
                    }
                }
                Err(rejection) => self.notice = Some(self.describe(rejection, machine.state().credits)),
            }
        }
        Flow::Continue
    }

    /// Drain both notification channels after an event was handled.
    pub fn absorb<St: Store, S: TickScheduler>(
        &mut self,
        transitions: &mut broadcast::Receiver<Event>,
        ticks: &mut broadcast::Receiver<TickUpdate>,
        machine: &FocusMachine<St, S>,
    ) {
        loop {
            match ticks.try_recv() {
                Ok(update) => self.tick = Some(update),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        let mut changed = false;
        loop {
            match transitions.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.snapshot = machine.snapshot();
            self.tick = None;
        }
    }

    /// Seconds of the option `step` places after the current selection.
    fn cycle_duration<St: Store, S: TickScheduler>(
        &self,
        machine: &FocusMachine<St, S>,
        step: usize,
    ) -> u64 {
        let current = DURATIONS
            .iter()
            .position(|d| d.seconds == machine.state().selected_duration)
            .unwrap_or(0);
        DURATIONS[(current + step) % DURATIONS.len()].seconds
    }

    fn describe(&self, rejection: Rejection, credits: u64) -> String {
        match rejection {
            Rejection::DurationLocked => match credits_to_deep_focus(credits) {
                Some(missing) => format!("Locked: {missing} more credits to unlock Deep Focus Mode"),
                None => rejection.to_string(),
            },
            Rejection::EmptyName => "Please enter your name".into(),
            Rejection::EmptyTaskName => "What are you working on?".into(),
            other => other.to_string(),
        }
    }
}
