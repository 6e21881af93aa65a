use super::*;

use chrono::TimeZone;

fn message(timestamp: Option<&str>) -> ChatMessage {
    ChatMessage { user: "bob".to_owned(), content: "hi".to_owned(), timestamp: timestamp.map(str::to_owned) }
}

#[test]
fn own_messages_align_right() {
    assert_eq!(row_class(true), "chat-row chat-row--mine");
    assert_eq!(row_class(false), "chat-row");
}

#[test]
fn bubble_class_combines_modifiers() {
    assert_eq!(bubble_class(false, false), "chat-bubble");
    assert_eq!(bubble_class(true, false), "chat-bubble chat-bubble--mine");
    assert_eq!(bubble_class(true, true), "chat-bubble chat-bubble--mine chat-bubble--dark");
}

#[test]
fn page_class_follows_dark_mode() {
    assert_eq!(page_class(true), "chat-page chat-page--dark");
    assert_eq!(page_class(false), "chat-page");
}

#[test]
fn timestamp_label_is_relative_to_now() {
    let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 10, 5).unwrap();
    assert_eq!(timestamp_label(&message(Some("2026-01-02T03:04:05.000Z")), now), "6 minutes ago");
}

#[test]
fn timestamp_label_is_empty_without_usable_timestamp() {
    let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(timestamp_label(&message(None), now), "");
    assert_eq!(timestamp_label(&message(Some("yesterday")), now), "");
}
