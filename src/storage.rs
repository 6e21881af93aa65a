//! Persisted client-side key-value state: the credential and UI preferences.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser front end backs [`KeyValueStore`] with `localStorage`, the CLI
//! with a JSON file, and tests with [`MemoryStore`]. Writes are best-effort:
//! a store that cannot persist logs and carries on, mirroring how browsers
//! treat a full or disabled `localStorage`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Storage key holding the bearer credential.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the dark mode preference (`"true"` / `"false"`).
pub const DARK_MODE_KEY: &str = "darkMode";

/// Minimal string key-value store with immediate read-after-write visibility.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }
}

/// Opaque bearer token issued by the auth backend.
///
/// `Debug` output is redacted so the token never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Holder of the single credential, stored under [`TOKEN_KEY`].
#[derive(Clone, Debug, Default)]
pub struct TokenStore<S> {
    store: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<Credential> {
        self.store.get(TOKEN_KEY).map(Credential)
    }

    pub fn set(&self, credential: &Credential) {
        self.store.set(TOKEN_KEY, credential.as_str());
    }

    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
    }
}

/// UI preferences that outlive a single session.
#[derive(Clone, Debug, Default)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored dark mode preference, `None` when never set.
    pub fn dark_mode(&self) -> Option<bool> {
        self.store.get(DARK_MODE_KEY).map(|v| v == "true")
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" });
    }
}
