//! Realtime chat session: one authenticated Socket.IO connection per mounted
//! chat view.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`RealtimeSession::open`] splits a session into three parts:
//!
//! - [`SessionHandle`] : owned by the view; sends messages and closes.
//! - [`SessionEvents`] : the single inbound subscription, drained by the view.
//! - [`SessionDriver`] : the reader loop. The host spawns
//!   [`SessionDriver::run`] on its executor (`spawn_local` in the browser,
//!   the main task in the CLI) and logs the result.
//!
//! State moves `Idle → Connecting → Ready → Closed`. A local close is
//! idempotent, takes effect immediately for senders and subscribers, and ends
//! the reader loop, which then releases the transport exactly once. When the
//! server or the transport ends the session instead, the subscription still
//! yields every event received before the end.
//!
//! TRADE-OFFS
//! ==========
//! There is no reconnect. A dropped or rejected connection ends the session;
//! the host only logs it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};
use futures::channel::{mpsc, oneshot};
use futures::stream::FusedStream;
use futures::{FutureExt, Sink, SinkExt, Stream, StreamExt, select_biased};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{SendError, TransportError};
use crate::storage::Credential;
use crate::wire::{self, Packet};

/// Inbound event carrying the authenticated username, sent once.
pub const IDENTITY_EVENT: &str = "userInfo";
/// Chat broadcast event name, used in both directions.
pub const CHAT_EVENT: &str = "chat message";

/// Opens the underlying text-frame transport.
pub trait Connector {
    type Sink: Sink<String, Error = TransportError> + Unpin;
    type Stream: Stream<Item = Result<String, TransportError>> + Unpin;

    fn connect(&self, url: &str) -> impl Future<Output = Result<(Self::Sink, Self::Stream), TransportError>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Ready,
    Closed,
}

impl SessionState {
    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Connecting => 1,
            Self::Ready => 2,
            Self::Closed => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Connecting,
            2 => Self::Ready,
            _ => Self::Closed,
        }
    }
}

#[derive(Debug)]
struct StateCell {
    state: AtomicU8,
    /// Set only by the handle; cuts the subscription off without draining.
    closed_locally: AtomicBool,
}

/// State cell shared by the handle, the subscription and the driver.
#[derive(Clone, Debug)]
struct SharedState(Arc<StateCell>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(StateCell {
            state: AtomicU8::new(SessionState::Idle.as_u8()),
            closed_locally: AtomicBool::new(false),
        }))
    }

    fn get(&self) -> SessionState {
        SessionState::from_u8(self.0.state.load(Ordering::SeqCst))
    }

    /// Move `from → to`; fails if another transition (usually close) won.
    fn advance(&self, from: SessionState, to: SessionState) -> bool {
        self.0
            .state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Returns `true` only for the call that performed the transition.
    fn close(&self) -> bool {
        self.0.state.swap(SessionState::Closed.as_u8(), Ordering::SeqCst) != SessionState::Closed.as_u8()
    }

    fn close_locally(&self) -> bool {
        self.0.closed_locally.store(true, Ordering::SeqCst);
        self.close()
    }

    fn closed_locally(&self) -> bool {
        self.0.closed_locally.load(Ordering::SeqCst)
    }
}

/// Identity of the authenticated connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub username: String,
}

/// A chat message as held by the view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    pub content: String,
    /// Client receipt time, RFC 3339 UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
struct InboundChat {
    user: String,
    content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Identity(SessionIdentity),
    Message(ChatMessage),
}

/// A freshly opened session, not yet connected.
pub struct RealtimeSession<C> {
    pub handle: SessionHandle,
    pub events: SessionEvents,
    pub driver: SessionDriver<C>,
}

impl<C: Connector> RealtimeSession<C> {
    /// Prepare a session against `url`. Nothing touches the network until
    /// the driver runs.
    pub fn open(connector: C, credential: Credential, url: impl Into<String>) -> Self {
        let state = SharedState::new();
        let (outbound_tx, outbound_rx) = mpsc::unbounded();
        let (events_tx, events_rx) = mpsc::unbounded();
        let (released_tx, released_rx) = oneshot::channel();

        Self {
            handle: SessionHandle { outbound: outbound_tx, state: state.clone(), released: Some(released_rx) },
            events: SessionEvents { inbound: events_rx, state: state.clone() },
            driver: SessionDriver {
                connector,
                url: url.into(),
                credential,
                state,
                outbound: outbound_rx,
                events: events_tx,
                released: released_tx,
                clock: Utc::now,
            },
        }
    }
}

/// Caller side of a session. Dropping the handle closes the session.
#[derive(Debug)]
pub struct SessionHandle {
    outbound: mpsc::UnboundedSender<String>,
    state: SharedState,
    released: Option<oneshot::Receiver<()>>,
}

impl SessionHandle {
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Forward `text` as a chat message. Fire-and-forget: success means the
    /// message was queued for the socket, not delivered.
    ///
    /// # Errors
    ///
    /// [`SendError::Empty`] for blank text, [`SendError::NotReady`] while
    /// connecting, [`SendError::Closed`] after close.
    pub fn send(&self, text: &str) -> Result<(), SendError> {
        if text.trim().is_empty() {
            return Err(SendError::Empty);
        }
        match self.state.get() {
            SessionState::Ready => {}
            SessionState::Closed => return Err(SendError::Closed),
            SessionState::Idle | SessionState::Connecting => return Err(SendError::NotReady),
        }
        let frame = wire::encode(&Packet::event(CHAT_EVENT, vec![Value::String(text.to_owned())]));
        self.outbound.unbounded_send(frame).map_err(|_| SendError::Closed)
    }

    /// Close the session. Safe to call any number of times.
    pub fn close(&self) {
        if self.state.close_locally() {
            tracing::debug!("realtime session closing");
        }
        self.outbound.close_channel();
    }

    /// Close and wait until the driver has released the transport.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(released) = self.released.take() {
            // Cancelled means the driver was dropped, which also releases it.
            let _ = released.await;
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// The single inbound subscription. Ends at once on a local close; after a
/// server or transport end it first yields what was already received.
#[derive(Debug)]
pub struct SessionEvents {
    inbound: mpsc::UnboundedReceiver<SessionEvent>,
    state: SharedState,
}

impl Stream for SessionEvents {
    type Item = SessionEvent;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        if self.state.closed_locally() {
            return std::task::Poll::Ready(None);
        }
        self.inbound.poll_next_unpin(cx)
    }
}

/// Reader loop owning the transport.
pub struct SessionDriver<C> {
    connector: C,
    url: String,
    credential: Credential,
    state: SharedState,
    outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<SessionEvent>,
    released: oneshot::Sender<()>,
    clock: fn() -> DateTime<Utc>,
}

/// What one inbound frame asks the loop to do next.
enum Step {
    Continue,
    Stop,
}

impl<C: Connector> SessionDriver<C> {
    /// Replace the receipt-time clock.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Connect, authenticate and pump frames until the session closes.
    ///
    /// `identity_deadline` resolves when the session has waited long enough
    /// for its `userInfo` event; it is ignored once identity arrives.
    ///
    /// # Errors
    ///
    /// Any [`TransportError`] that ended the session. A local close or a
    /// server-initiated disconnect returns `Ok(())`.
    pub async fn run<T>(self, identity_deadline: T) -> Result<(), TransportError>
    where
        T: Future<Output = ()>,
    {
        let state = self.state.clone();
        let released = self.released;
        let mut io = Io {
            state: self.state,
            credential: self.credential,
            events: self.events,
            clock: self.clock,
            identified: false,
        };

        let result = drive(&self.connector, &self.url, &mut io, self.outbound, identity_deadline).await;
        state.close();
        drop(released);

        match &result {
            Ok(()) => tracing::info!("realtime session closed"),
            Err(e) => tracing::warn!(error = %e, "realtime session ended"),
        }
        result
    }
}

/// Per-connection state used while frames are pumped.
struct Io {
    state: SharedState,
    credential: Credential,
    events: mpsc::UnboundedSender<SessionEvent>,
    clock: fn() -> DateTime<Utc>,
    identified: bool,
}

async fn drive<C, T>(
    connector: &C,
    url: &str,
    io: &mut Io,
    mut outbound: mpsc::UnboundedReceiver<String>,
    identity_deadline: T,
) -> Result<(), TransportError>
where
    C: Connector,
    T: Future<Output = ()>,
{
    if !io.state.advance(SessionState::Idle, SessionState::Connecting) {
        return Ok(());
    }
    tracing::debug!(%url, "realtime session connecting");

    let mut deadline = pin!(identity_deadline.fuse());
    let mut connect = pin!(connector.connect(url).fuse());

    let (mut sink, stream) = loop {
        select_biased! {
            queued = outbound.next() => {
                if queued.is_none() {
                    return Ok(());
                }
            }
            () = deadline => return Err(TransportError::IdentityTimeout),
            result = connect => break result?,
        }
    };
    let mut stream = stream.fuse();

    let result = pump(io, &mut sink, &mut stream, &mut outbound, deadline.as_mut()).await;

    if result.is_ok() && !stream.is_terminated() {
        // Best effort: the peer may already be gone.
        let _ = sink.send(wire::encode(&Packet::Disconnect)).await;
    }
    let _ = sink.close().await;
    result
}

async fn pump<K, S, T>(
    io: &mut Io,
    sink: &mut K,
    stream: &mut futures::stream::Fuse<S>,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    mut deadline: std::pin::Pin<&mut futures::future::Fuse<T>>,
) -> Result<(), TransportError>
where
    K: Sink<String, Error = TransportError> + Unpin,
    S: Stream<Item = Result<String, TransportError>> + Unpin,
    T: Future<Output = ()>,
{
    loop {
        select_biased! {
            queued = outbound.next() => match queued {
                Some(frame) => sink.send(frame).await?,
                None => return Ok(()),
            },
            frame = stream.next() => match frame {
                Some(Ok(text)) => {
                    if let Step::Stop = io.on_frame(sink, &text).await? {
                        return Ok(());
                    }
                }
                Some(Err(e)) => return Err(e),
                None => return Err(TransportError::Closed),
            },
            () = deadline => {
                if !io.identified {
                    return Err(TransportError::IdentityTimeout);
                }
            }
        }
    }
}

impl Io {
    async fn on_frame<K>(&mut self, sink: &mut K, text: &str) -> Result<Step, TransportError>
    where
        K: Sink<String, Error = TransportError> + Unpin,
    {
        let packet = match wire::decode(text) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable realtime frame");
                return Ok(Step::Continue);
            }
        };

        match packet {
            Packet::Open(handshake) => {
                tracing::debug!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "transport open");
                let auth = json!({ "token": self.credential.as_str() });
                sink.send(wire::encode(&Packet::Connect(Some(auth)))).await?;
            }
            Packet::Ping => sink.send(wire::encode(&Packet::Pong)).await?,
            Packet::Connect(_) => {
                if self.state.advance(SessionState::Connecting, SessionState::Ready) {
                    tracing::info!("realtime session ready");
                }
            }
            Packet::ConnectError(data) => {
                let message = data
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| data.to_string(), ToOwned::to_owned);
                return Err(TransportError::Rejected(message));
            }
            Packet::Close | Packet::Disconnect => {
                tracing::info!("server ended realtime session");
                return Ok(Step::Stop);
            }
            Packet::Event { name, args } => self.on_event(&name, args),
            Packet::Pong | Packet::Noop => {}
        }
        Ok(Step::Continue)
    }

    fn on_event(&mut self, name: &str, mut args: Vec<Value>) {
        let payload = if args.is_empty() { Value::Null } else { args.swap_remove(0) };

        let event = match name {
            IDENTITY_EVENT => {
                if self.identified {
                    tracing::debug!("ignoring repeated identity event");
                    return;
                }
                match serde_json::from_value::<SessionIdentity>(payload) {
                    Ok(identity) => {
                        self.identified = true;
                        tracing::info!(username = %identity.username, "session identity received");
                        SessionEvent::Identity(identity)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "malformed identity event");
                        return;
                    }
                }
            }
            CHAT_EVENT => match serde_json::from_value::<InboundChat>(payload) {
                Ok(chat) => SessionEvent::Message(ChatMessage {
                    user: chat.user,
                    content: chat.content,
                    timestamp: Some((self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true)),
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "malformed chat event");
                    return;
                }
            },
            other => {
                tracing::debug!(event = other, "ignoring unknown realtime event");
                return;
            }
        };

        if !self.state.closed_locally() {
            let _ = self.events.unbounded_send(event);
        }
    }
}

/// Holds at most one live session for a mounted chat view.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: Option<SessionHandle>,
}

impl SessionSlot {
    /// Install `handle`, closing whatever session was there before.
    ///
    /// The previous session is closed before `handle` is stored: it refuses
    /// sends and ends its subscription at once. Its driver sends the
    /// disconnect and releases the transport the next time it is polled.
    pub fn install(&mut self, handle: SessionHandle) {
        if let Some(previous) = self.current.take() {
            previous.close();
        }
        self.current = Some(handle);
    }

    #[must_use]
    pub fn handle(&self) -> Option<&SessionHandle> {
        self.current.as_ref()
    }

    /// `Idle` when no session was ever installed.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.current.as_ref().map_or(SessionState::Idle, SessionHandle::state)
    }

    /// Forward `text` through the current session.
    ///
    /// # Errors
    ///
    /// [`SendError::NoSession`] when empty, otherwise as [`SessionHandle::send`].
    pub fn send(&self, text: &str) -> Result<(), SendError> {
        self.current.as_ref().ok_or(SendError::NoSession)?.send(text)
    }

    /// Close and drop the current session, if any.
    pub fn close(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.close();
        }
    }
}
