//! Interactive chat loop.
//!
//! The session driver and the terminal loop run side by side on one task.
//! Either side ending closes the other: a local `/quit` closes the session,
//! and a closed session ends the event stream the loop is reading.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use chatroom::config::ClientConfig;
use chatroom::error::{SendError, TransportError};
use chatroom::session::{Connector, RealtimeSession, SessionEvent, SessionSlot};
use chatroom::state::chat::{ChatState, logout, mount_session};
use chatroom::storage::{KeyValueStore, TokenStore};

use crate::render;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("not logged in; run `chatroom-cli login` first")]
    NotLoggedIn,
    #[error("realtime session failed: {0}")]
    Transport(#[from] TransportError),
}

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Quit,
    Logout,
    Message(String),
}

pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/quit" => Input::Quit,
        "/logout" => Input::Logout,
        _ => Input::Message(line.to_owned()),
    }
}

/// Why the loop returned.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatExit {
    Quit,
    LoggedOut,
    Disconnected,
}

/// Fold `event` into `chat` and render it as a terminal line.
fn show(chat: &mut ChatState, event: SessionEvent, width: usize) -> String {
    match event {
        SessionEvent::Identity(identity) => {
            let line = render::identity_line(&identity.username);
            chat.apply(SessionEvent::Identity(identity));
            line
        }
        SessionEvent::Message(message) => {
            let line = render::message_line(&message, chat.is_mine(&message), width);
            chat.apply(SessionEvent::Message(message));
            line
        }
    }
}

/// Run one chat session until the user leaves or the server goes away.
///
/// Closing `lines` counts as `/quit`.
///
/// # Errors
///
/// [`ChatError::NotLoggedIn`] without a stored credential, or the transport
/// error that ended the session when the user did not leave first.
pub async fn run<C, S>(
    connector: C,
    tokens: &TokenStore<S>,
    config: &ClientConfig,
    mut lines: mpsc::UnboundedReceiver<String>,
    out: &mut impl FnMut(String),
    width: usize,
) -> Result<ChatExit, ChatError>
where
    C: Connector,
    S: KeyValueStore,
{
    let Some(RealtimeSession { handle, mut events, driver }) = mount_session(connector, tokens, &config.realtime_url)
    else {
        return Err(ChatError::NotLoggedIn);
    };
    let mut slot = SessionSlot::default();
    slot.install(handle);

    let ui = async {
        let mut chat = ChatState::new(false);
        loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else {
                        return ChatExit::Disconnected;
                    };
                    out(show(&mut chat, event, width));
                }
                line = lines.recv() => {
                    let Some(line) = line else {
                        slot.close();
                        return ChatExit::Quit;
                    };
                    match parse_input(&line) {
                        Input::Quit => {
                            slot.close();
                            return ChatExit::Quit;
                        }
                        Input::Logout => {
                            logout(tokens, &mut slot);
                            return ChatExit::LoggedOut;
                        }
                        Input::Message(text) => {
                            chat.draft = text;
                            match chat.send_draft(&slot) {
                                Ok(()) | Err(SendError::Empty) => {}
                                Err(e) => out(format!("-- not sent: {e} --")),
                            }
                        }
                    }
                }
            }
        }
    };

    let (outcome, exit) = tokio::join!(driver.run(tokio::time::sleep(config.identity_timeout)), ui);
    match (exit, outcome) {
        (ChatExit::Disconnected, Err(e)) => Err(e.into()),
        (exit, _) => Ok(exit),
    }
}
