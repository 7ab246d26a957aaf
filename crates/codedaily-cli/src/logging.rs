//! File-based tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to `codedaily.log` in the
//! data directory. `CODEDAILY_LOG` takes an `EnvFilter` directive.

use std::fs::OpenOptions;
use std::sync::Mutex;

use codedaily_core::storage::data_dir;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "codedaily.log";

pub fn init() {
    let Ok(dir) = data_dir() else {
        return;
    };
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    let filter = EnvFilter::try_from_env("CODEDAILY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
