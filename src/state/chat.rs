//! Chat room view state.
//!
//! The model never touches the socket directly. Inbound traffic arrives as
//! [`SessionEvent`]s through [`ChatState::apply`]; outbound text goes through
//! the [`SessionSlot`] that owns the live session.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use crate::error::SendError;
use crate::session::{ChatMessage, Connector, RealtimeSession, SessionEvent, SessionSlot};
use crate::storage::{KeyValueStore, Preferences, TokenStore};
use crate::wire;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub username: Option<String>,
    pub draft: String,
    pub dark_mode: bool,
}

impl ChatState {
    #[must_use]
    pub fn new(dark_mode: bool) -> Self {
        Self { dark_mode, ..Self::default() }
    }

    /// Fold one session event into the view.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Identity(identity) => {
                tracing::debug!(username = %identity.username, "identity received");
                self.username = Some(identity.username);
            }
            SessionEvent::Message(message) => self.messages.push(message),
        }
    }

    /// Whether `message` was written by the current user. Always `false`
    /// until the server has told us who we are.
    #[must_use]
    pub fn is_mine(&self, message: &ChatMessage) -> bool {
        self.username.as_deref().is_some_and(|me| me == message.user)
    }

    /// Forward the draft and clear it. The draft is kept when the send is
    /// refused so nothing the user typed is lost.
    ///
    /// # Errors
    ///
    /// Whatever [`SessionSlot::send`] refuses with.
    pub fn send_draft(&mut self, slot: &SessionSlot) -> Result<(), SendError> {
        slot.send(&self.draft)?;
        self.draft.clear();
        Ok(())
    }

    /// Flip and persist the dark-mode preference. Returns the new value.
    pub fn toggle_dark_mode<S: KeyValueStore>(&mut self, preferences: &Preferences<S>) -> bool {
        self.dark_mode = !self.dark_mode;
        preferences.set_dark_mode(self.dark_mode);
        self.dark_mode
    }
}

/// Dark mode on first render: the stored preference, light until toggled.
#[must_use]
pub fn initial_dark_mode<S: KeyValueStore>(preferences: &Preferences<S>) -> bool {
    preferences.dark_mode().unwrap_or(false)
}

/// Open the chat view's session. `None` when no credential is stored, in
/// which case nothing is connected.
pub fn mount_session<C, S>(connector: C, tokens: &TokenStore<S>, realtime_url: &str) -> Option<RealtimeSession<C>>
where
    C: Connector,
    S: KeyValueStore,
{
    let Some(credential) = tokens.get() else {
        tracing::warn!("chat mounted without a stored credential");
        return None;
    };
    Some(RealtimeSession::open(connector, credential, wire::websocket_url(realtime_url)))
}

/// Forget the credential, then close the session that was opened with it.
pub fn logout<S: KeyValueStore>(tokens: &TokenStore<S>, slot: &mut SessionSlot) {
    tokens.clear();
    slot.close();
    tracing::info!("logged out");
}
