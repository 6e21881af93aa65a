//! Display helpers for chat messages.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Upper-cased first letter of `name`, or `?` when empty.
#[must_use]
pub fn avatar_initial(name: &str) -> String {
    name.chars()
        .next()
        .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect())
}

/// Human distance between `timestamp` and `now`, e.g. `"3 minutes ago"`.
///
/// Returns `None` when `timestamp` is not RFC 3339.
#[must_use]
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let then = DateTime::parse_from_rfc3339(timestamp).ok()?.with_timezone(&Utc);
    let seconds = (now - then).num_seconds();
    let distance = distance_words(seconds.abs());
    Some(if seconds < 0 { format!("in {distance}") } else { format!("{distance} ago") })
}

fn distance_words(seconds: i64) -> String {
    let rounded = |unit: i64| (seconds + unit / 2) / unit;

    if seconds < 30 {
        "less than a minute".to_owned()
    } else if seconds < 90 {
        "1 minute".to_owned()
    } else if seconds < 45 * MINUTE - 30 {
        format!("{} minutes", rounded(MINUTE))
    } else if seconds < 90 * MINUTE - 30 {
        "about 1 hour".to_owned()
    } else if seconds < DAY - 30 {
        format!("about {} hours", rounded(HOUR))
    } else if seconds < 42 * HOUR - 30 {
        "1 day".to_owned()
    } else if seconds < MONTH {
        format!("{} days", rounded(DAY))
    } else if seconds < 2 * MONTH {
        "about 1 month".to_owned()
    } else if seconds < YEAR {
        format!("{} months", rounded(MONTH))
    } else if seconds < 2 * YEAR {
        "about 1 year".to_owned()
    } else {
        format!("{} years", seconds / YEAR)
    }
}
