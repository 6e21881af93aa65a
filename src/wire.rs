//! Socket.IO text packet codec for the realtime chat channel.
//!
//! The chat backend speaks Socket.IO v4 over a plain WebSocket (Engine.IO
//! protocol 4). Only the default namespace and text packets are supported;
//! binary attachments and acknowledgements are rejected at decode time.
//!
//! Packet layout: one Engine.IO type digit, then for Engine.IO `message`
//! packets (`4`) one Socket.IO type digit followed by an optional JSON
//! payload, e.g. `42["chat message","hi"]`.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::Deserialize;
use serde_json::Value;

/// Query suffix selecting Engine.IO v4 over a raw WebSocket.
pub const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

/// Error returned by [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("empty packet")]
    Empty,
    #[error("unknown packet type `{0}`")]
    UnknownType(char),
    #[error("unsupported packet type `{0}`")]
    Unsupported(&'static str),
    #[error("packet for namespace `{0}` is not handled")]
    Namespace(String),
    #[error("event payload must be a JSON array starting with a name")]
    MalformedEvent,
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine.IO `open` payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// A decoded text packet.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    /// Engine.IO `0`: transport opened.
    Open(Handshake),
    /// Engine.IO `1`: transport closing.
    Close,
    /// Engine.IO `2`: server heartbeat; must be answered with [`Packet::Pong`].
    Ping,
    /// Engine.IO `3`.
    Pong,
    /// Engine.IO `6`.
    Noop,
    /// Socket.IO `0`: namespace connect. Client to server carries the auth
    /// payload; server to client carries `{"sid": ...}`.
    Connect(Option<Value>),
    /// Socket.IO `1`.
    Disconnect,
    /// Socket.IO `2`: named event with JSON arguments.
    Event { name: String, args: Vec<Value> },
    /// Socket.IO `4`: the server refused the namespace connect.
    ConnectError(Value),
}

impl Packet {
    pub fn event(name: &str, args: Vec<Value>) -> Self {
        Self::Event { name: name.to_owned(), args }
    }
}

/// Encode a packet as a WebSocket text frame.
#[must_use]
pub fn encode(packet: &Packet) -> String {
    match packet {
        Packet::Open(_) => "0".to_owned(),
        Packet::Close => "1".to_owned(),
        Packet::Ping => "2".to_owned(),
        Packet::Pong => "3".to_owned(),
        Packet::Noop => "6".to_owned(),
        Packet::Connect(None) => "40".to_owned(),
        Packet::Connect(Some(auth)) => format!("40{auth}"),
        Packet::Disconnect => "41".to_owned(),
        Packet::Event { name, args } => {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(Value::String(name.clone()));
            items.extend(args.iter().cloned());
            format!("42{}", Value::Array(items))
        }
        Packet::ConnectError(data) => format!("44{data}"),
    }
}

/// Decode one WebSocket text frame.
///
/// # Errors
///
/// Returns [`CodecError`] for empty frames, unknown or unsupported packet
/// types, non-default namespaces, and malformed JSON payloads.
pub fn decode(text: &str) -> Result<Packet, CodecError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let rest = chars.as_str();

    match kind {
        '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
        '1' => Ok(Packet::Close),
        // Probe pings carry a payload; it has no meaning once upgraded.
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(rest),
        '5' => Err(CodecError::Unsupported("upgrade")),
        '6' => Ok(Packet::Noop),
        other => Err(CodecError::UnknownType(other)),
    }
}

fn decode_message(text: &str) -> Result<Packet, CodecError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let body = strip_namespace(chars.as_str())?;

    match kind {
        '0' => Ok(Packet::Connect(parse_optional(body)?)),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(strip_ack_id(body)),
        '3' => Err(CodecError::Unsupported("ack")),
        '4' => Ok(Packet::ConnectError(parse_optional(body)?.unwrap_or(Value::Null))),
        '5' | '6' => Err(CodecError::Unsupported("binary")),
        other => Err(CodecError::UnknownType(other)),
    }
}

/// Strip a `/nsp,` prefix, accepting only the default namespace.
fn strip_namespace(body: &str) -> Result<&str, CodecError> {
    if !body.starts_with('/') {
        return Ok(body);
    }
    let (namespace, rest) = body.split_once(',').unwrap_or((body, ""));
    if namespace == "/" {
        Ok(rest)
    } else {
        Err(CodecError::Namespace(namespace.to_owned()))
    }
}

fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn parse_optional(body: &str) -> Result<Option<Value>, CodecError> {
    if body.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::from_str(body)?))
    }
}

fn decode_event(body: &str) -> Result<Packet, CodecError> {
    let Value::Array(mut items) = serde_json::from_str(body)? else {
        return Err(CodecError::MalformedEvent);
    };
    if items.is_empty() {
        return Err(CodecError::MalformedEvent);
    }
    let Value::String(name) = items.remove(0) else {
        return Err(CodecError::MalformedEvent);
    };
    Ok(Packet::Event { name, args: items })
}

/// Derive the WebSocket endpoint from a backend origin such as
/// `http://localhost:3001`.
#[must_use]
pub fn websocket_url(origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let origin = if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if origin.starts_with("ws://") || origin.starts_with("wss://") {
        origin.to_owned()
    } else {
        format!("ws://{origin}")
    };
    format!("{origin}{SOCKET_PATH}")
}
