//! Account registration form. Success returns to the login form; the new
//! account is not logged in automatically.

use leptos::prelude::*;

use chatroom::state::auth::{self, AuthForm};
use chatroom::storage::TokenStore;

use crate::net::api_client;
use crate::util::storage::LocalStorage;

#[component]
pub fn RegisterPage(on_success: Callback<()>, on_switch: Callback<()>) -> impl IntoView {
    let form = RwSignal::new(AuthForm::default());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(credentials) = form.try_update(AuthForm::begin_submit).flatten() else {
            return;
        };
        leptos::task::spawn_local(async move {
            let api = api_client(TokenStore::new(LocalStorage));
            let outcome = auth::submit_register(&api, &credentials).await;
            form.update(|f| f.finish(outcome));
            if outcome.is_ok() {
                on_success.run(());
            }
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1 class="auth-card__title">"Register"</h1>
                <input
                    class="auth-input"
                    type="text"
                    placeholder="Username"
                    autocomplete="username"
                    prop:value=move || form.with(|f| f.username.clone())
                    on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Password"
                    autocomplete="new-password"
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                />
                <Show when=move || form.with(|f| f.error.is_some())>
                    <p class="auth-error">{move || form.with(|f| f.error.unwrap_or_default())}</p>
                </Show>
                <button class="auth-button" type="submit" disabled=move || form.with(|f| f.busy)>
                    "Register"
                </button>
                <p class="auth-switch">
                    "Already have an account? "
                    <a
                        href="#"
                        on:click=move |ev| {
                            ev.prevent_default();
                            on_switch.run(());
                        }
                    >
                        "Login"
                    </a>
                </p>
            </form>
        </div>
    }
}
