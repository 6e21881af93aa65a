//! Page modules for the three top-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages never change the current screen themselves. They receive callbacks
//! from the root component and call them when an action succeeds.

pub mod chat;
pub mod login;
pub mod register;
