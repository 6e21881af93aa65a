use super::*;
use chatroom::session::{RealtimeSession, SessionEvent, SessionState};
use chatroom::storage::Credential;

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::WebSocketStream;

const OPEN: &str = r#"0{"sid":"eio-1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

async fn next_text(ws: &mut WebSocketStream<tokio::net::TcpStream>) -> Option<String> {
    while let Some(frame) = ws.next().await {
        if let Message::Text(text) = frame.ok()? {
            return Some(text.as_str().to_owned());
        }
    }
    None
}

#[test]
fn only_text_frames_pass_through() {
    assert_eq!(text_frame(Ok(Message::text("2"))), Some(Ok("2".to_owned())));
    assert_eq!(text_frame(Ok(Message::Binary(vec![1, 2].into()))), None);
    assert_eq!(text_frame(Ok(Message::Ping(Default::default()))), None);
    assert!(matches!(
        text_frame(Err(tungstenite::Error::ConnectionClosed)),
        Some(Err(TransportError::Recv(_)))
    ));
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = TungsteniteConnector.connect(&format!("ws://{addr}/socket.io/")).await;
    assert!(matches!(result, Err(TransportError::Connect(_))));
}

#[tokio::test]
async fn session_runs_over_a_real_websocket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (got_hello_tx, got_hello_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::text(OPEN)).await.unwrap();
        let connect = next_text(&mut ws).await;
        ws.send(Message::text(r#"40{"sid":"sio-1"}"#)).await.unwrap();
        ws.send(Message::text(r#"42["userInfo",{"username":"alice"}]"#)).await.unwrap();
        ws.send(Message::text(r#"42["chat message",{"user":"bob","content":"hi"}]"#)).await.unwrap();
        let sent = next_text(&mut ws).await;
        let _ = got_hello_tx.send(());
        let disconnect = next_text(&mut ws).await;
        (connect, sent, disconnect)
    });

    let url = format!("ws://{addr}/socket.io/?EIO=4&transport=websocket");
    let RealtimeSession { handle, mut events, driver } =
        RealtimeSession::open(TungsteniteConnector, Credential::new("abc123"), url);

    let client = async move {
        assert!(matches!(events.next().await, Some(SessionEvent::Identity(id)) if id.username == "alice"));
        let Some(SessionEvent::Message(message)) = events.next().await else {
            panic!("expected chat message");
        };
        assert_eq!((message.user.as_str(), message.content.as_str()), ("bob", "hi"));
        assert!(message.timestamp.is_some());

        assert_eq!(handle.state(), SessionState::Ready);
        handle.send("hello").unwrap();
        got_hello_rx.await.unwrap();
        handle.shutdown().await;
    };

    let (outcome, ()) = tokio::join!(driver.run(tokio::time::sleep(Duration::from_secs(5))), client);
    assert_eq!(outcome, Ok(()));

    let (connect, sent, disconnect) = server.await.unwrap();
    assert_eq!(connect.as_deref(), Some(r#"40{"token":"abc123"}"#));
    assert_eq!(sent.as_deref(), Some(r#"42["chat message","hello"]"#));
    assert_eq!(disconnect.as_deref(), Some("41"));
}
