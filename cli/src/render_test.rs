use super::*;

fn message(user: &str, content: &str, timestamp: Option<&str>) -> ChatMessage {
    ChatMessage { user: user.to_owned(), content: content.to_owned(), timestamp: timestamp.map(str::to_owned) }
}

#[test]
fn other_messages_are_left_aligned() {
    let line = message_line(&message("bob", "hey", None), false, 40);
    assert_eq!(line, "[B] bob: hey");
}

#[test]
fn own_messages_are_right_aligned() {
    let line = message_line(&message("alice", "hi", None), true, 20);
    assert_eq!(line, "       [A] alice: hi");
    assert_eq!(line.chars().count(), 20);
}

#[test]
fn long_own_messages_are_not_truncated() {
    let line = message_line(&message("alice", "a long message body", None), true, 5);
    assert_eq!(line, "[A] alice: a long message body");
}

#[test]
fn timestamp_is_shown_as_local_clock_time() {
    let ts = "2026-01-02T03:04:05.000Z";
    let expected = DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Local).format("%H:%M").to_string();

    let line = message_line(&message("bob", "hey", Some(ts)), false, 40);
    assert_eq!(line, format!("{expected} [B] bob: hey"));
}

#[test]
fn bad_timestamp_is_omitted() {
    assert_eq!(time_label("soon"), None);
    assert_eq!(message_line(&message("bob", "hey", Some("soon")), false, 40), "[B] bob: hey");
}

#[test]
fn identity_line_names_user() {
    assert_eq!(identity_line("alice"), "-- connected as alice --");
}
