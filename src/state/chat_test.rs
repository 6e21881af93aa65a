use super::*;
use crate::error::SendError;
use crate::session::{SessionIdentity, SessionState};
use crate::storage::{Credential, MemoryStore};
use crate::testing::{CONNECT_ACK, FakeConnector, OPEN, spawn_driver};

use std::sync::atomic::Ordering;

use futures::executor::LocalPool;

fn message(user: &str, content: &str) -> ChatMessage {
    ChatMessage { user: user.to_owned(), content: content.to_owned(), timestamp: None }
}

fn identity(name: &str) -> SessionEvent {
    SessionEvent::Identity(SessionIdentity { username: name.to_owned() })
}

// =============================================================
// Applying events
// =============================================================

#[test]
fn messages_append_in_arrival_order() {
    let mut chat = ChatState::new(false);
    for i in 0..5 {
        chat.apply(SessionEvent::Message(message("bob", &format!("m{i}"))));
    }
    let contents: Vec<_> = chat.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["m0", "m1", "m2", "m3", "m4"]);
}

#[test]
fn nothing_is_mine_before_identity() {
    let mut chat = ChatState::new(false);
    let own = message("alice", "hi");
    assert!(!chat.is_mine(&own));

    chat.apply(identity("alice"));
    assert!(chat.is_mine(&own));
    assert!(!chat.is_mine(&message("bob", "hey")));
}

// =============================================================
// Draft
// =============================================================

#[test]
fn draft_is_kept_when_there_is_no_session() {
    let mut chat = ChatState::new(false);
    chat.draft = "hello".to_owned();

    assert_eq!(chat.send_draft(&SessionSlot::default()), Err(SendError::NoSession));
    assert_eq!(chat.draft, "hello");
}

#[test]
fn blank_draft_is_rejected_and_kept() {
    let (connector, mut server) = FakeConnector::new();
    let tokens = TokenStore::new(MemoryStore::new());
    tokens.set(&Credential::new("abc123"));
    let session = mount_session(connector, &tokens, "http://localhost:3001").unwrap();

    let mut pool = LocalPool::new();
    spawn_driver(&pool, session.driver);
    pool.run_until_stalled();
    server.push(OPEN);
    server.push(CONNECT_ACK);
    pool.run_until_stalled();

    let mut slot = SessionSlot::default();
    slot.install(session.handle);
    let mut chat = ChatState::new(false);
    chat.draft = "   ".to_owned();

    assert_eq!(chat.send_draft(&slot), Err(SendError::Empty));
    assert_eq!(chat.draft, "   ");
    pool.run_until_stalled();
    assert_eq!(server.written(), vec![r#"40{"token":"abc123"}"#.to_owned()]);
}

// =============================================================
// Dark mode
// =============================================================

#[test]
fn toggle_dark_mode_persists_preference() {
    let store = MemoryStore::new();
    let preferences = Preferences::new(store.clone());
    let mut chat = ChatState::new(false);

    assert!(chat.toggle_dark_mode(&preferences));
    assert_eq!(store.get("darkMode").as_deref(), Some("true"));

    assert!(!chat.toggle_dark_mode(&preferences));
    assert_eq!(preferences.dark_mode(), Some(false));
}

#[test]
fn initial_dark_mode_is_light_until_stored() {
    let preferences = Preferences::new(MemoryStore::new());
    assert!(!initial_dark_mode(&preferences));

    preferences.set_dark_mode(true);
    assert!(initial_dark_mode(&preferences));

    preferences.set_dark_mode(false);
    assert!(!initial_dark_mode(&preferences));
}

// =============================================================
// Mount and logout
// =============================================================

#[test]
fn mount_without_credential_opens_nothing() {
    let (connector, _server) = FakeConnector::new();
    let attempts = connector.attempts();
    let tokens = TokenStore::new(MemoryStore::new());

    assert!(mount_session(connector, &tokens, "http://localhost:3001").is_none());
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[test]
fn mount_targets_socket_endpoint() {
    let (connector, _server) = FakeConnector::new();
    let urls = connector.urls();
    let tokens = TokenStore::new(MemoryStore::new());
    tokens.set(&Credential::new("abc123"));

    let session = mount_session(connector, &tokens, "https://chat.example.test/").unwrap();
    let mut pool = LocalPool::new();
    spawn_driver(&pool, session.driver);
    pool.run_until_stalled();

    assert_eq!(session.handle.state(), SessionState::Connecting);
    assert_eq!(
        urls.lock().unwrap().as_slice(),
        ["wss://chat.example.test/socket.io/?EIO=4&transport=websocket"]
    );
}

#[test]
fn logout_clears_token_and_closes_session() {
    let (connector, _server) = FakeConnector::new();
    let tokens = TokenStore::new(MemoryStore::new());
    tokens.set(&Credential::new("abc123"));
    let session = mount_session(connector, &tokens, "http://localhost:3001").unwrap();

    let mut slot = SessionSlot::default();
    slot.install(session.handle);
    logout(&tokens, &mut slot);

    assert!(tokens.get().is_none());
    assert_eq!(slot.state(), SessionState::Idle);
    assert_eq!(slot.send("late"), Err(SendError::NoSession));
}
