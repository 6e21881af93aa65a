//! Login and registration form state.
//!
//! ERROR HANDLING
//! ==============
//! Every failure collapses into one static message per form. The underlying
//! [`ApiError`](crate::error::ApiError) is logged so the distinction between a
//! bad password and an unreachable backend survives in the console.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::api::{ApiClient, HttpBackend};
use crate::storage::{Credential, KeyValueStore, TokenStore};

pub const LOGIN_FAILED: &str = "Invalid credentials";
pub const REGISTER_FAILED: &str = "User already exists";
pub const MISSING_FIELDS: &str = "Enter a username and password.";

/// Username and password ready to submit.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Shared state of the login and register forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub error: Option<&'static str>,
    pub busy: bool,
}

impl AuthForm {
    /// Validate and lock the form for submission.
    ///
    /// Returns `None` while a submission is in flight or when a field is
    /// empty (setting [`MISSING_FIELDS`] in the latter case).
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.busy {
            return None;
        }
        match validate(&self.username, &self.password) {
            Ok(credentials) => {
                self.busy = true;
                self.error = None;
                Some(credentials)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    /// Unlock the form and record the outcome of a submission.
    pub fn finish(&mut self, outcome: Result<(), &'static str>) {
        self.busy = false;
        match outcome {
            Ok(()) => {
                self.error = None;
                self.password.clear();
            }
            Err(message) => self.error = Some(message),
        }
    }
}

/// Require a non-blank username and a non-empty password.
///
/// # Errors
///
/// Returns [`MISSING_FIELDS`] when either field is missing.
pub fn validate(username: &str, password: &str) -> Result<Credentials, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok(Credentials { username: username.to_owned(), password: password.to_owned() })
}

/// Log in and store the returned credential.
///
/// # Errors
///
/// Returns [`LOGIN_FAILED`] for any failure; the token store is untouched.
pub async fn submit_login<H, S>(
    api: &ApiClient<H, S>,
    tokens: &TokenStore<S>,
    credentials: &Credentials,
) -> Result<(), &'static str>
where
    H: HttpBackend,
    S: KeyValueStore,
{
    match api.login(&credentials.username, &credentials.password).await {
        Ok(response) => {
            tokens.set(&Credential::new(response.token));
            tracing::info!(username = %credentials.username, "logged in");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(username = %credentials.username, error = %e, "login failed");
            Err(LOGIN_FAILED)
        }
    }
}

/// Create an account. Does not log in.
///
/// # Errors
///
/// Returns [`REGISTER_FAILED`] for any failure.
pub async fn submit_register<H, S>(api: &ApiClient<H, S>, credentials: &Credentials) -> Result<(), &'static str>
where
    H: HttpBackend,
    S: KeyValueStore,
{
    match api.register(&credentials.username, &credentials.password).await {
        Ok(()) => {
            tracing::info!(username = %credentials.username, "registered");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(username = %credentials.username, error = %e, "registration failed");
            Err(REGISTER_FAILED)
        }
    }
}
