//! Build-time endpoint configuration.
//!
//! A WASM bundle has no process environment, so the `CHAT_*` variables are
//! captured by `option_env!` when the crate is compiled.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use chatroom::config::{API_URL_VAR, ClientConfig, IDENTITY_TIMEOUT_VAR, REALTIME_URL_VAR};

fn build_env(name: &str) -> Option<String> {
    let value = match name {
        API_URL_VAR => option_env!("CHAT_API_URL"),
        REALTIME_URL_VAR => option_env!("CHAT_REALTIME_URL"),
        IDENTITY_TIMEOUT_VAR => option_env!("CHAT_IDENTITY_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(str::to_owned)
}

/// Endpoints baked into this build, defaults where unset.
pub fn load() -> ClientConfig {
    ClientConfig::from_lookup(build_env)
}
