//! Root application component.
//!
//! There is no URL routing. The root owns a [`Router`] signal and swaps
//! between the three pages; pages report outcomes through callbacks.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use chatroom::state::router::{Router, View};
use chatroom::storage::TokenStore;

use crate::pages::{chat::ChatPage, login::LoginPage, register::RegisterPage};
use crate::util::storage::LocalStorage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let has_credential = TokenStore::new(LocalStorage).get().is_some();
    let router = RwSignal::new(Router::initial(has_credential));

    let on_login = Callback::new(move |()| {
        router.update(|r| {
            r.on_login();
        });
    });
    let on_registered = Callback::new(move |()| {
        router.update(|r| {
            r.on_register_success();
        });
    });
    let to_register = Callback::new(move |()| {
        router.update(|r| {
            r.switch_to_register();
        });
    });
    let to_login = Callback::new(move |()| {
        router.update(|r| {
            r.switch_to_login();
        });
    });
    let on_logout = Callback::new(move |()| {
        router.update(|r| {
            r.on_logout();
        });
    });

    view! {
        <Title text="Chat Room"/>
        {move || match router.with(|r| r.view()) {
            View::Login => view! { <LoginPage on_success=on_login on_switch=to_register/> }.into_any(),
            View::Register => view! { <RegisterPage on_success=on_registered on_switch=to_login/> }.into_any(),
            View::Chat => view! { <ChatPage on_logout=on_logout/> }.into_any(),
        }}
    }
}
