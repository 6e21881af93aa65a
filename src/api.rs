//! REST client for the auth backend.
//!
//! Requests are built here and handed to an [`HttpBackend`]; the browser
//! front end sends them with `gloo-net`, the CLI with `reqwest`. Every request
//! passes through [`ApiClient::authorize`], which attaches the stored
//! credential as a bearer token when one exists.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::storage::{KeyValueStore, TokenStore};

pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";

/// A fully built `POST` request, ready for a transport. Both endpoints take
/// a JSON body, so there is no method field.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// First header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns whatever status the server produced.
///
/// Implementations return `Err` only when no response was received at all.
pub trait HttpBackend {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Auth API bound to one backend origin.
#[derive(Debug, Clone)]
pub struct ApiClient<H, S> {
    base_url: String,
    http: H,
    tokens: TokenStore<S>,
}

impl<H: HttpBackend, S: KeyValueStore> ApiClient<H, S> {
    pub fn new(base_url: impl Into<String>, http: H, tokens: TokenStore<S>) -> Self {
        Self { base_url: base_url.into(), http, tokens }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] for any non-2xx status, [`ApiError::Network`] when
    /// the backend is unreachable, [`ApiError::Decode`] when the success body
    /// lacks a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self.post(LOGIN_PATH, &CredentialsBody { username, password });
        let response = self.http.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Auth { status: response.status });
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Conflict`] on 409, [`ApiError::Auth`] on any other
    /// non-2xx status, [`ApiError::Network`] when the backend is unreachable.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = self.post(REGISTER_PATH, &CredentialsBody { username, password });
        let response = self.http.send(request).await?;
        match response.status {
            200..=299 => Ok(()),
            409 => Err(ApiError::Conflict),
            status => Err(ApiError::Auth { status }),
        }
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiRequest {
        let mut request = ApiRequest {
            url: self.endpoint(path),
            headers: vec![("Content-Type", "application/json".to_owned())],
            body: serde_json::to_value(body).ok(),
        };
        self.authorize(&mut request);
        request
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Attach `Authorization: Bearer <token>` when a credential is stored.
    /// Read on every call so a login or logout is picked up immediately.
    fn authorize(&self, request: &mut ApiRequest) {
        if let Some(credential) = self.tokens.get() {
            request
                .headers
                .push(("Authorization", format!("Bearer {}", credential.as_str())));
        }
    }
}
