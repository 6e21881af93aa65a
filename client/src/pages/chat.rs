//! Chat room: message list, composer, dark-mode and logout controls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting opens one realtime session with the stored credential. Two local
//! tasks run alongside the page: the session driver, and a pump that folds
//! session events into the [`ChatState`] signal. Unmounting or logging out
//! closes the session, which ends both tasks.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use leptos::prelude::*;

use chatroom::error::SendError;
use chatroom::format::{avatar_initial, relative_time};
use chatroom::session::{ChatMessage, RealtimeSession, SessionSlot};
use chatroom::state::chat::{ChatState, logout, mount_session};
use chatroom::storage::{Preferences, TokenStore};

use crate::net::socket::{BrowserSocket, identity_deadline};
use crate::util::{config, dark_mode, storage::LocalStorage};

fn page_class(dark: bool) -> &'static str {
    if dark { "chat-page chat-page--dark" } else { "chat-page" }
}

fn row_class(mine: bool) -> &'static str {
    if mine { "chat-row chat-row--mine" } else { "chat-row" }
}

fn bubble_class(mine: bool, dark: bool) -> String {
    let mut class = String::from("chat-bubble");
    if mine {
        class.push_str(" chat-bubble--mine");
    }
    if dark {
        class.push_str(" chat-bubble--dark");
    }
    class
}

/// Relative label for a message, empty when it carries no usable timestamp.
fn timestamp_label(message: &ChatMessage, now: DateTime<Utc>) -> String {
    message
        .timestamp
        .as_deref()
        .and_then(|ts| relative_time(ts, now))
        .unwrap_or_default()
}

fn start_session(chat: RwSignal<ChatState>, slot: StoredValue<SessionSlot>) {
    let config = config::load();
    let tokens = TokenStore::new(LocalStorage);
    let Some(RealtimeSession { handle, mut events, driver }) =
        mount_session(BrowserSocket, &tokens, &config.realtime_url)
    else {
        return;
    };
    slot.update_value(|s| s.install(handle));

    leptos::task::spawn_local(async move {
        match driver.run(identity_deadline(config.identity_timeout)).await {
            Ok(()) => leptos::logging::log!("realtime session closed"),
            Err(e) => leptos::logging::warn!("realtime session ended: {e}"),
        }
    });
    leptos::task::spawn_local(async move {
        while let Some(event) = events.next().await {
            if chat.try_update(|c| c.apply(event)).is_none() {
                break;
            }
        }
    });
}

#[component]
pub fn ChatPage(on_logout: Callback<()>) -> impl IntoView {
    let preferences = Preferences::new(LocalStorage);
    let chat = RwSignal::new(ChatState::new(dark_mode::read_preference(&preferences)));
    let slot = StoredValue::new(SessionSlot::default());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    start_session(chat, slot);
    on_cleanup(move || {
        slot.try_update_value(SessionSlot::close);
    });

    Effect::new(move || dark_mode::apply(chat.with(|c| c.dark_mode)));

    Effect::new(move || {
        let _ = chat.with(|c| c.messages.len());

        #[cfg(feature = "csr")]
        {
            if let Some(el) = messages_ref.get() {
                el.set_scroll_top(el.scroll_height());
            }
        }
    });

    let do_send = move || {
        let outcome = slot.with_value(|s| chat.try_update(|c| c.send_draft(s)));
        match outcome {
            Some(Ok(()) | Err(SendError::Empty)) | None => {}
            Some(Err(e)) => leptos::logging::warn!("message not sent: {e}"),
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        do_send();
    };

    let on_toggle_dark = move |_| {
        chat.update(|c| {
            c.toggle_dark_mode(&preferences);
        });
    };

    let on_logout_click = move |_| {
        let tokens = TokenStore::new(LocalStorage);
        slot.update_value(|s| logout(&tokens, s));
        on_logout.run(());
    };

    let dark = move || chat.with(|c| c.dark_mode);

    view! {
        <div class=move || page_class(dark())>
            <header class="chat-header">
                <h1 class="chat-header__title">"Chat Room"</h1>
                <span class="chat-header__user">
                    {move || chat.with(|c| c.username.clone().unwrap_or_default())}
                </span>
                <button class="chat-header__button" on:click=on_toggle_dark>
                    {move || if dark() { "Light mode" } else { "Dark mode" }}
                </button>
                <button class="chat-header__button" on:click=on_logout_click>
                    "Logout"
                </button>
            </header>

            <div class="chat-messages" node_ref=messages_ref>
                {move || {
                    let now = Utc::now();
                    chat.with(|c| {
                        c.messages
                            .iter()
                            .map(|message| {
                                let mine = c.is_mine(message);
                                let initial = avatar_initial(&message.user);
                                let user = message.user.clone();
                                let content = message.content.clone();
                                let when = timestamp_label(message, now);
                                view! {
                                    <div class=row_class(mine)>
                                        <div class="chat-avatar">{initial}</div>
                                        <div class=bubble_class(mine, c.dark_mode)>
                                            <span class="chat-bubble__user">{user}</span>
                                            <p class="chat-bubble__text">{content}</p>
                                            <span class="chat-bubble__time">{when}</span>
                                        </div>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                    })
                }}
            </div>

            <form class="chat-composer" on:submit=on_submit>
                <input
                    class="chat-composer__input"
                    type="text"
                    placeholder="Type a message..."
                    prop:value=move || chat.with(|c| c.draft.clone())
                    on:input=move |ev| chat.update(|c| c.draft = event_target_value(&ev))
                />
                <button
                    class="chat-composer__send"
                    type="submit"
                    disabled=move || chat.with(|c| c.draft.trim().is_empty())
                >
                    "Send"
                </button>
            </form>
        </div>
    }
}
