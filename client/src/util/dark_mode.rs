//! Dark mode initialization and toggle.
//!
//! The preference itself lives in [`Preferences`] under `darkMode`; this
//! module applies it as a `data-theme` attribute on the `<html>` element.
//! Requires a browser environment.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use chatroom::state::chat::initial_dark_mode;
use chatroom::storage::Preferences;

use super::storage::LocalStorage;

/// Value written to `<html data-theme="...">`.
pub fn theme_name(enabled: bool) -> &'static str {
    if enabled { "dark" } else { "light" }
}

/// Stored preference; light when nothing is stored.
pub fn read_preference(preferences: &Preferences<LocalStorage>) -> bool {
    initial_dark_mode(preferences)
}

/// Apply the `data-theme` attribute on the `<html>` element.
pub fn apply(enabled: bool) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) {
            let _ = el.set_attribute("data-theme", theme_name(enabled));
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = enabled;
    }
}
