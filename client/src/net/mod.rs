//! Browser transports for the core crate's network seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` sends REST requests with `gloo-net`, `socket` opens the realtime
//! WebSocket. Both compile to stubs without the `csr` feature.

pub mod http;
pub mod socket;

use chatroom::api::ApiClient;
use chatroom::storage::TokenStore;

use self::http::GlooHttp;
use crate::util::storage::LocalStorage;

pub type BrowserApi = ApiClient<GlooHttp, LocalStorage>;

/// REST client bound to the configured base URL and `localStorage` tokens.
pub fn api_client(tokens: TokenStore<LocalStorage>) -> BrowserApi {
    ApiClient::new(crate::util::config::load().api_base_url, GlooHttp, tokens)
}
