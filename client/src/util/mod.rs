//! Browser helpers shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! These modules isolate `web-sys` access from page logic. Without the `csr`
//! feature every helper compiles to a no-op so the crate still builds and
//! tests natively.

pub mod config;
pub mod dark_mode;
pub mod storage;
