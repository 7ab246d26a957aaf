//! The persisted user profile: `username` and `credits`.
//!
//! Reads fall back to defaults and writes are fire-and-forget; failures are
//! logged and never surface to the state machine.

use super::Store;

pub const DEFAULT_KEY_PREFIX: &str = "code_daily_";

/// Store keys for the profile values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileKeys {
    pub username: String,
    pub credits: String,
}

impl ProfileKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            username: format!("{prefix}username"),
            credits: format!("{prefix}credits"),
        }
    }
}

impl Default for ProfileKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

#[derive(Debug)]
pub struct Profile<St> {
    store: St,
    keys: ProfileKeys,
}

impl<St: Store> Profile<St> {
    pub fn new(store: St, keys: ProfileKeys) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn keys(&self) -> &ProfileKeys {
        &self.keys
    }

    /// Empty when missing or unreadable.
    pub fn load_username(&self) -> String {
        match self.store.get(&self.keys.username) {
            Ok(name) => name.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read username, treating as signed out");
                String::new()
            }
        }
    }

    /// Zero when missing, unparseable or unreadable.
    pub fn load_credits(&self) -> u64 {
        match self.store.get(&self.keys.credits) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "stored credits are not a number, using 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read credits, using 0");
                0
            }
        }
    }

    pub fn save_username(&mut self, username: &str) {
        if let Err(e) = self.store.set(&self.keys.username, username) {
            tracing::warn!(error = %e, "failed to persist username");
        }
    }

    pub fn clear_username(&mut self) {
        if let Err(e) = self.store.remove(&self.keys.username) {
            tracing::warn!(error = %e, "failed to remove username");
        }
    }

    pub fn save_credits(&mut self, credits: u64) {
        if let Err(e) = self.store.set(&self.keys.credits, &credits.to_string()) {
            tracing::warn!(error = %e, credits, "failed to persist credits");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl Store for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Locked)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Locked)
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Locked)
        }
    }

    #[test]
    fn keys_use_prefix() {
        let keys = ProfileKeys::default();
        assert_eq!(keys.username, "code_daily_username");
        assert_eq!(keys.credits, "code_daily_credits");
    }

    #[test]
    fn missing_values_default() {
        let profile = Profile::new(MemoryStore::new(), ProfileKeys::default());
        assert_eq!(profile.load_username(), "");
        assert_eq!(profile.load_credits(), 0);
    }

    #[test]
    fn invalid_credits_default_to_zero() {
        let store = MemoryStore::with_values([("code_daily_credits", "lots")]);
        let profile = Profile::new(store, ProfileKeys::default());
        assert_eq!(profile.load_credits(), 0);
    }

    #[test]
    fn negative_credits_default_to_zero() {
        let store = MemoryStore::with_values([("code_daily_credits", "-20")]);
        let profile = Profile::new(store, ProfileKeys::default());
        assert_eq!(profile.load_credits(), 0);
    }

    #[test]
    fn round_trips_values() {
        let mut profile = Profile::new(MemoryStore::new(), ProfileKeys::with_prefix("t_"));
        profile.save_username("Ada");
        profile.save_credits(120);
        assert_eq!(profile.store().raw("t_username"), Some("Ada"));
        assert_eq!(profile.load_credits(), 120);
        profile.clear_username();
        assert_eq!(profile.load_username(), "");
    }

    #[test]
    fn broken_store_degrades_gracefully() {
        let mut profile = Profile::new(BrokenStore, ProfileKeys::default());
        assert_eq!(profile.load_username(), "");
        assert_eq!(profile.load_credits(), 0);
        profile.save_credits(10);
        profile.clear_username();
    }
}
