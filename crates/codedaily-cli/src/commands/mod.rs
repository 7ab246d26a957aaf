pub mod config;
pub mod profile;
pub mod run;
pub mod unlocks;

use codedaily_core::{Config, Database, FocusMachine, ManualScheduler, Profile};
use serde::Serialize;

/// Machine for one-shot commands. Nothing ticks; these commands never start
/// a countdown.
pub type OneShotMachine = FocusMachine<Database, ManualScheduler>;

/// Open the persisted profile using the configured key prefix.
pub fn open_profile(config: &Config) -> codedaily_core::error::Result<Profile<Database>> {
    let db = Database::open()?;
    Ok(Profile::new(db, config.profile_keys()))
}

pub fn open_machine() -> Result<OneShotMachine, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    Ok(FocusMachine::new(open_profile(&config)?, ManualScheduler::new()))
}

/// Pretty-print any serialisable value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> codedaily_core::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_snapshot(machine: &OneShotMachine) -> codedaily_core::error::Result<()> {
    print_json(&machine.snapshot())
}
