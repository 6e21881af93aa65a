//! `tokio-tungstenite` implementation of [`Connector`].
//!
//! Socket.IO runs entirely over text frames. Binary, ping and pong frames
//! from the WebSocket layer are dropped; tungstenite answers pings itself.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::pin::Pin;

use futures_util::{Sink, SinkExt, Stream, StreamExt, future};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

use chatroom::error::TransportError;
use chatroom::session::Connector;

pub type SocketSink = Pin<Box<dyn Sink<String, Error = TransportError> + Send>>;
pub type SocketStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

#[derive(Clone, Copy, Debug, Default)]
pub struct TungsteniteConnector;

fn text_frame(frame: Result<Message, tungstenite::Error>) -> Option<Result<String, TransportError>> {
    match frame {
        Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
        Ok(_) => None,
        Err(e) => Some(Err(TransportError::Recv(e.to_string()))),
    }
}

impl Connector for TungsteniteConnector {
    type Sink = SocketSink;
    type Stream = SocketStream;

    async fn connect(&self, url: &str) -> Result<(Self::Sink, Self::Stream), TransportError> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        let (write, read) = ws.split();

        let sink = write
            .with(|text: String| future::ready(Ok::<_, tungstenite::Error>(Message::text(text))))
            .sink_map_err(|e| TransportError::Send(e.to_string()));
        let stream = read.filter_map(|frame| future::ready(text_frame(frame)));

        let sink: SocketSink = Box::pin(sink);
        let stream: SocketStream = Box::pin(stream);
        Ok((sink, stream))
    }
}
