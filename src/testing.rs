//! In-memory fakes for the HTTP and socket seams.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::channel::mpsc;
use futures::{Sink, SinkExt};

use crate::api::{ApiRequest, ApiResponse, HttpBackend};
use crate::error::{ApiError, TransportError};
use crate::session::Connector;

/// Replays scripted responses and records every request it sees.
#[derive(Clone, Default)]
pub struct FakeHttp {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse, ApiError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeHttp {
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body: body.to_owned() }));
        self
    }

    pub fn fail(&self, error: ApiError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpBackend for FakeHttp {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_owned())))
    }
}

pub type FakeSink = Pin<Box<dyn Sink<String, Error = TransportError> + Send>>;
pub type FakeStream = mpsc::UnboundedReceiver<Result<String, TransportError>>;

/// Test-side ends of a fake socket.
pub struct FakeServer {
    /// Frames pushed here arrive at the client.
    pub to_client: mpsc::UnboundedSender<Result<String, TransportError>>,
    /// Frames the client wrote.
    pub from_client: mpsc::UnboundedReceiver<String>,
}

impl FakeServer {
    pub fn push(&self, frame: &str) {
        self.to_client.unbounded_send(Ok(frame.to_owned())).unwrap();
    }

    /// Drain every frame the client has written so far.
    pub fn written(&mut self) -> Vec<String> {
        use futures::{FutureExt, StreamExt};

        let mut out = Vec::new();
        while let Some(Some(frame)) = self.from_client.next().now_or_never() {
            out.push(frame);
        }
        out
    }
}

/// Connector handing out one pre-built in-memory socket.
pub struct FakeConnector {
    socket: Mutex<Option<(FakeSink, FakeStream)>>,
    attempts: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<String>>>,
    refuse: Option<TransportError>,
}

impl FakeConnector {
    pub fn new() -> (Self, FakeServer) {
        let (to_client, client_rx) = mpsc::unbounded();
        let (client_tx, from_client) = mpsc::unbounded::<String>();
        let sink: FakeSink = Box::pin(client_tx.sink_map_err(|e| TransportError::Send(e.to_string())));
        let connector = Self {
            socket: Mutex::new(Some((sink, client_rx))),
            attempts: Arc::new(AtomicUsize::new(0)),
            urls: Arc::new(Mutex::new(Vec::new())),
            refuse: None,
        };
        (connector, FakeServer { to_client, from_client })
    }

    pub fn refusing(error: TransportError) -> Self {
        let (mut connector, _server) = Self::new();
        connector.refuse = Some(error);
        connector
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }

    pub fn urls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.urls)
    }
}

impl Connector for FakeConnector {
    type Sink = FakeSink;
    type Stream = FakeStream;

    async fn connect(&self, url: &str) -> Result<(Self::Sink, Self::Stream), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_owned());
        if let Some(error) = &self.refuse {
            return Err(error.clone());
        }
        self.socket
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::Connect("fake socket already used".to_owned()))
    }
}

/// Standard Engine.IO open packet used by session tests.
pub const OPEN: &str = r#"0{"sid":"eio-1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
/// Socket.IO connect acknowledgement.
pub const CONNECT_ACK: &str = r#"40{"sid":"sio-1"}"#;

/// Spawn `driver` on `pool` with an identity deadline that never fires.
pub fn spawn_driver(pool: &futures::executor::LocalPool, driver: crate::session::SessionDriver<FakeConnector>) {
    use futures::task::LocalSpawnExt;

    pool.spawner()
        .spawn_local(async move {
            let _ = driver.run(futures::future::pending::<()>()).await;
        })
        .unwrap();
}
