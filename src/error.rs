//! Error types shared by the API client and the realtime session.
//!
//! ERROR HANDLING
//! ==============
//! None of these are fatal. Auth views collapse [`ApiError`] into one static
//! message per view; [`TransportError`] ends a realtime session and is only
//! logged by the host that spawned it.

/// Failure of a REST call against the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Credentials were rejected, or the backend refused the request.
    #[error("authentication failed (status {status})")]
    Auth { status: u16 },
    /// Registration collided with an existing username.
    #[error("user already exists")]
    Conflict,
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Network(String),
    /// A 2xx response carried a body we could not parse.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Failure of the realtime connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),
    /// The backend answered the handshake with `CONNECT_ERROR`.
    #[error("connection rejected: {0}")]
    Rejected(String),
    /// No `userInfo` event arrived before the identity deadline.
    #[error("timed out waiting for session identity")]
    IdentityTimeout,
    #[error("send failed: {0}")]
    Send(String),
    #[error("receive failed: {0}")]
    Recv(String),
    /// The remote end went away without a disconnect packet.
    #[error("connection closed")]
    Closed,
}

/// Reason a chat message was not forwarded to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("message is empty")]
    Empty,
    #[error("no realtime session")]
    NoSession,
    #[error("session is not ready")]
    NotReady,
    #[error("session is closed")]
    Closed,
}
