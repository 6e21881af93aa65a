//! Terminal rendering of chat lines.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use chrono::{DateTime, Local};

use chatroom::format::avatar_initial;
use chatroom::session::ChatMessage;

/// Local wall-clock `HH:MM` of an RFC 3339 timestamp.
pub fn time_label(timestamp: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(parsed.with_timezone(&Local).format("%H:%M").to_string())
}

/// One printable line per message. Own messages are right-aligned to `width`.
pub fn message_line(message: &ChatMessage, mine: bool, width: usize) -> String {
    let mut line = String::new();
    if let Some(time) = message.timestamp.as_deref().and_then(time_label) {
        line.push_str(&format!("{time} "));
    }
    line.push_str(&format!("[{}] {}: {}", avatar_initial(&message.user), message.user, message.content));
    if mine { format!("{line:>width$}") } else { line }
}

pub fn identity_line(username: &str) -> String {
    format!("-- connected as {username} --")
}
