//! `gloo-net` WebSocket implementation of [`Connector`].
//!
//! Socket.IO runs entirely over text frames, so binary frames are dropped.
//! The socket closes when both halves are dropped or the sink is closed.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::{Sink, Stream};

use chatroom::error::TransportError;
use chatroom::session::Connector;

pub type SocketSink = Pin<Box<dyn Sink<String, Error = TransportError>>>;
pub type SocketStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>>>>;

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSocket;

impl Connector for BrowserSocket {
    type Sink = SocketSink;
    type Stream = SocketStream;

    async fn connect(&self, url: &str) -> Result<(Self::Sink, Self::Stream), TransportError> {
        #[cfg(feature = "csr")]
        {
            use futures::{SinkExt, StreamExt, future};
            use gloo_net::websocket::{Message, WebSocketError, futures::WebSocket};

            let ws = WebSocket::open(url).map_err(|e| TransportError::Connect(e.to_string()))?;
            let (write, read) = ws.split();

            let sink = write
                .with(|text: String| future::ready(Ok::<_, WebSocketError>(Message::Text(text))))
                .sink_map_err(|e| TransportError::Send(e.to_string()));
            let stream = read.filter_map(|frame| {
                future::ready(match frame {
                    Ok(Message::Text(text)) => Some(Ok(text)),
                    Ok(Message::Bytes(_)) => None,
                    Err(e) => Some(Err(TransportError::Recv(e.to_string()))),
                })
            });
            let sink: SocketSink = Box::pin(sink);
            let stream: SocketStream = Box::pin(stream);
            Ok((sink, stream))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError::Connect(format!("websocket unavailable outside the browser: {url}")))
        }
    }
}

/// Future that fires once `timeout` has elapsed. Never fires natively.
pub fn identity_deadline(timeout: Duration) -> impl Future<Output = ()> {
    #[cfg(feature = "csr")]
    {
        gloo_timers::future::sleep(timeout)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = timeout;
        futures::future::pending::<()>()
    }
}
