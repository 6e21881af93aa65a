//! # client
//!
//! Leptos + WASM front end for the chat room. Client-side rendered; build
//! with `trunk serve --features csr`.
//!
//! The view models, REST client and realtime session live in the `chatroom`
//! core crate. This crate supplies the browser implementations of its seams
//! (`gloo-net` HTTP and WebSocket, `localStorage`) and the components.

pub mod app;
pub mod net;
pub mod pages;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // The core crate logs through `tracing`, whose `log` feature forwards
    // records here when no subscriber is installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
