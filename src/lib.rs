//! # chatroom
//!
//! Client core for a single-room chat service: credential storage, the REST
//! auth client, the Socket.IO wire codec, the realtime session lifecycle, and
//! the plain view-state models shared by the browser (`client/`) and terminal
//! (`cli/`) front ends.
//!
//! Nothing in this crate touches the network or the browser directly. HTTP
//! goes through [`api::HttpBackend`], sockets through [`session::Connector`],
//! and persisted state through [`storage::KeyValueStore`], so every flow can
//! run against in-memory fakes.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod state;
pub mod storage;
pub mod wire;

#[cfg(test)]
mod testing;
