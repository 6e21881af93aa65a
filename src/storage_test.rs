use super::*;

// =============================================================
// TokenStore
// =============================================================

#[test]
fn token_store_empty_by_default() {
    let tokens = TokenStore::new(MemoryStore::new());
    assert!(tokens.get().is_none());
}

#[test]
fn token_store_returns_last_set_value() {
    let tokens = TokenStore::new(MemoryStore::new());
    for value in ["abc123", "", "with spaces and ünïcode", "abc123"] {
        tokens.set(&Credential::new(value));
        assert_eq!(tokens.get(), Some(Credential::new(value)));
    }
}

#[test]
fn token_store_clear_removes_credential() {
    let tokens = TokenStore::new(MemoryStore::new());
    tokens.set(&Credential::new("abc123"));
    tokens.clear();
    assert!(tokens.get().is_none());

    // Clearing twice is harmless.
    tokens.clear();
    assert!(tokens.get().is_none());
}

#[test]
fn token_store_writes_are_visible_through_cloned_handles() {
    let store = MemoryStore::new();
    let writer = TokenStore::new(store.clone());
    let reader = TokenStore::new(store.clone());

    writer.set(&Credential::new("t-1"));
    assert_eq!(reader.get().map(|c| c.as_str().to_owned()), Some("t-1".to_owned()));
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t-1"));
}

#[test]
fn credential_debug_is_redacted() {
    let rendered = format!("{:?}", Credential::new("super-secret"));
    assert!(!rendered.contains("super-secret"));
}

// =============================================================
// Preferences
// =============================================================

#[test]
fn dark_mode_unset_until_written() {
    let prefs = Preferences::new(MemoryStore::new());
    assert_eq!(prefs.dark_mode(), None);
}

#[test]
fn dark_mode_persists_as_string_flag() {
    let store = MemoryStore::new();
    let prefs = Preferences::new(store.clone());

    prefs.set_dark_mode(true);
    assert_eq!(prefs.dark_mode(), Some(true));
    assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("true"));

    prefs.set_dark_mode(false);
    assert_eq!(prefs.dark_mode(), Some(false));
    assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
}

#[test]
fn dark_mode_treats_unknown_values_as_disabled() {
    let store = MemoryStore::new();
    store.set(DARK_MODE_KEY, "yes");
    assert_eq!(Preferences::new(store).dark_mode(), Some(false));
}
