//! Interactive terminal session.
//!
//! One current-thread tokio runtime owns the machine. Key presses (from a
//! blocking reader thread) and countdown ticks (from the scheduler's interval
//! task) arrive on the same queue and are handled one at a time.

use std::error::Error;
use std::io::{self, stdin};
use std::thread;

use codedaily_core::{Config, FocusMachine, TimerHandle, TokioScheduler};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use super::open_profile;
use crate::tui::{self, Flow, TuiApp};

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick(TimerHandle),
}

impl From<TimerHandle> for AppEvent {
    fn from(handle: TimerHandle) -> Self {
        AppEvent::Tick(handle)
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        return Err("stdin must be a tty".into());
    }

    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    runtime.block_on(event_loop(&mut terminal, &config))
}

/// Raw mode and the alternate screen, undone on drop whatever the exit path.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        Self::enter_with(
            enable_raw_mode,
            || execute!(io::stdout(), EnterAlternateScreen),
            restore_terminal,
        )
    }

    /// `restore` is armed as soon as `raw` succeeds, so a failing `screen`
    /// still leaves raw mode.
    fn enter_with(
        raw: impl FnOnce() -> io::Result<()>,
        screen: impl FnOnce() -> io::Result<()>,
        restore: fn(),
    ) -> io::Result<Self> {
        raw()?;
        let guard = Self { restore };
        screen()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to leave raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        tracing::warn!(error = %e, "failed to leave the alternate screen");
    }
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_input_reader(tx.clone());

    let mut machine = FocusMachine::new(open_profile(config)?, TokioScheduler::new(tx));
    let mut transitions = machine.subscribe();
    let mut ticks = machine.subscribe_ticks();
    let mut app = TuiApp::new(machine.snapshot(), config.ui.clone());

    loop {
        terminal.draw(|f| tui::draw(f, &app))?;

        match rx.recv().await {
            Some(AppEvent::Tick(handle)) => {
                machine.on_tick(handle);
            }
            Some(AppEvent::Key(key)) => {
                if app.handle_key(key, &mut machine) == Flow::Quit {
                    break;
                }
            }
            Some(AppEvent::Resize) => {}
            None => break,
        }

        app.absorb(&mut transitions, &mut ticks, &machine);
    }

    Ok(())
}

fn spawn_input_reader(tx: UnboundedSender<AppEvent>) {
    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => AppEvent::Key(key),
            Ok(Event::Resize(_, _)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "terminal input failed");
                break;
            }
        };
        if tx.send(evt).is_err() {
            break;
        }
    });
}
