//! Backend endpoints and session timing.
//!
//! Values come from a key lookup so each front end can choose its source:
//! the CLI reads the process environment, the browser build bakes values in
//! at compile time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:10000/";
pub const DEFAULT_REALTIME_URL: &str = "http://localhost:3001";
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

pub const API_URL_VAR: &str = "CHAT_API_URL";
pub const REALTIME_URL_VAR: &str = "CHAT_REALTIME_URL";
pub const IDENTITY_TIMEOUT_VAR: &str = "CHAT_IDENTITY_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the REST auth backend; always ends with `/`.
    pub api_base_url: String,
    /// Origin of the Socket.IO backend (`http(s)://host:port`).
    pub realtime_url: String,
    /// How long a session may wait for its `userInfo` event.
    pub identity_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            realtime_url: DEFAULT_REALTIME_URL.to_owned(),
            identity_timeout: Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `CHAT_API_URL`: default `http://localhost:10000/`
    /// - `CHAT_REALTIME_URL`: default `http://localhost:3001`
    /// - `CHAT_IDENTITY_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base_url = non_blank(API_URL_VAR).map_or(defaults.api_base_url, |url| normalize_base_url(&url));
        let realtime_url = non_blank(REALTIME_URL_VAR)
            .map_or(defaults.realtime_url, |url| url.trim_end_matches('/').to_owned());
        let identity_timeout = non_blank(IDENTITY_TIMEOUT_VAR)
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(defaults.identity_timeout, Duration::from_secs);

        Self { api_base_url, realtime_url, identity_timeout }
    }
}

fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
