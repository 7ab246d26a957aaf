mod config;
pub mod database;
mod memory;
mod profile;

pub use config::{Config, StoreConfig, UiConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use profile::{Profile, ProfileKeys};

use std::path::PathBuf;

use crate::error::StoreError;

/// String-valued key-value persistence.
///
/// Implementations are assumed reliable; callers treat writes as
/// fire-and-forget and fall back to defaults on read failures.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `CODEDAILY_DATA_DIR` overrides the location. Otherwise it is
/// `~/.config/codedaily[-dev]/`, with `-dev` when `CODEDAILY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("CODEDAILY_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CODEDAILY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("codedaily-dev")
            } else {
                base_dir.join("codedaily")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(StoreError::DataDir)?;
    Ok(dir)
}
