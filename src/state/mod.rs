//! View-state models for the three screens.
//!
//! DESIGN
//! ======
//! Each model is plain data plus the transitions that act on it. The browser
//! front end wraps them in `RwSignal`s; the CLI holds them directly.

pub mod auth;
pub mod chat;
pub mod router;
