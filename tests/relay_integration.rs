//! End-to-end tests for the relay.
//!
//! Each test starts the real router on an ephemeral port, backed by
//! `MockAIProvider`, and talks to it with `ChatSession` or raw frames.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, Stream, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use chat_relay::adapters::ai::MockAIProvider;
use chat_relay::adapters::http::{app_router, HealthResponse};
use chat_relay::adapters::websocket::RelayState;
use chat_relay::client::{ChatSession, SessionUpdate};
use chat_relay::config::ServerConfig;
use chat_relay::domain::chat::{ConnectionStatus, Message, Origin};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    state: RelayState,
}

impl TestServer {
    async fn start(provider: MockAIProvider) -> Self {
        let state = RelayState::new(Arc::new(provider));
        let static_dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            static_dir: static_dir.path().to_string_lossy().into_owned(),
            ..ServerConfig::default()
        };
        let app = app_router(state.clone(), &config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Keep the static dir alive as long as the server.
            let _static_dir = static_dir;
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn wait_for_connections(&self, expected: usize) {
        for _ in 0..100 {
            if self.state.connections.count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} open connections", expected);
    }
}

/// Stand-in relay that answers the first prompt on each connection with
/// `ai-error` and then closes the socket from the server side.
async fn start_closing_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
                if let Some(Ok(WsMessage::Text(_))) = socket.next().await {
                    let reply = json!({"event": "ai-error", "data": {"message": "quota exceeded"}});
                    socket.send(WsMessage::Text(reply.to_string())).await.unwrap();
                }
                socket.close(None).await.ok();
            });
        }
    });
    format!("ws://{}/ws", addr)
}

async fn next_update(session: &mut ChatSession) -> SessionUpdate {
    tokio::time::timeout(Duration::from_secs(5), session.next_event())
        .await
        .expect("timed out waiting for reply")
        .expect("session closed")
}

async fn next_reply(session: &mut ChatSession) -> Message {
    match next_update(session).await {
        SessionUpdate::Appended(message) => message,
        other => panic!("expected reply, got {:?}", other),
    }
}

fn entries(session: &ChatSession) -> Vec<(Origin, String)> {
    session
        .transcript()
        .iter()
        .map(|m| (m.origin(), m.text().to_string()))
        .collect()
}

async fn next_frame<S>(stream: &mut S) -> Value
where
    S: Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let frame = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for frame")
        .expect("stream ended")
        .unwrap();
    match frame {
        WsMessage::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected text frame, got {:?}", other),
    }
}

// =============================================================================
// Relay through ChatSession
// =============================================================================

#[tokio::test]
async fn prompt_gets_ai_response() {
    let server = TestServer::start(MockAIProvider::new().with_response("Hi there!")).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    assert!(session.send("hello").await.unwrap());
    let reply = next_reply(&mut session).await;

    assert_eq!(reply.origin(), Origin::Ai);
    assert_eq!(reply.text(), "Hi there!");
    assert_eq!(
        entries(&session),
        vec![
            (Origin::User, "hello".to_string()),
            (Origin::Ai, "Hi there!".to_string()),
        ]
    );
}

#[tokio::test]
async fn provider_failure_becomes_system_message() {
    let server = TestServer::start(MockAIProvider::new().with_error("quota exceeded")).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.send("x").await.unwrap();
    let reply = next_reply(&mut session).await;

    assert_eq!(reply.origin(), Origin::System);
    assert_eq!(reply.text(), "quota exceeded");
}

#[tokio::test]
async fn failure_without_message_uses_fallback_text() {
    let server = TestServer::start(MockAIProvider::new().with_error("")).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.send("x").await.unwrap();
    let reply = next_reply(&mut session).await;

    assert_eq!(reply.origin(), Origin::System);
    assert_eq!(reply.text(), "AI request failed");
}

#[tokio::test]
async fn blank_input_is_not_sent() {
    let provider = MockAIProvider::new();
    let server = TestServer::start(provider.clone()).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    assert!(!session.send("   \t").await.unwrap());
    assert!(session.transcript().is_empty());

    session.send(" ping ").await.unwrap();
    next_reply(&mut session).await;

    assert_eq!(provider.get_calls(), vec!["ping".to_string()]);
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn replies_arrive_in_completion_order() {
    let provider = MockAIProvider::new()
        .with_delayed_response("slow", Duration::from_millis(300))
        .with_response("fast");
    let server = TestServer::start(provider.clone()).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.send("first").await.unwrap();
    // Let the first prompt take the slow response.
    while provider.call_count() < 1 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    session.send("second").await.unwrap();

    assert_eq!(next_reply(&mut session).await.text(), "fast");
    assert_eq!(next_reply(&mut session).await.text(), "slow");
    assert_eq!(
        entries(&session),
        vec![
            (Origin::User, "first".to_string()),
            (Origin::User, "second".to_string()),
            (Origin::Ai, "fast".to_string()),
            (Origin::Ai, "slow".to_string()),
        ]
    );
}

#[tokio::test]
async fn arrived_reply_is_recorded_before_next_input() {
    let server = TestServer::start(MockAIProvider::new().with_response("first reply")).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.send("one").await.unwrap();
    // Let the reply land in the session's queue without polling it.
    let mut drained = Vec::new();
    for _ in 0..100 {
        drained = session.drain_arrived();
        if !drained.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    session.send("two").await.unwrap();

    assert_eq!(drained.len(), 1);
    assert_eq!(
        entries(&session),
        vec![
            (Origin::User, "one".to_string()),
            (Origin::Ai, "first reply".to_string()),
            (Origin::User, "two".to_string()),
        ]
    );
}

#[tokio::test]
async fn drain_reports_server_disconnect() {
    let url = start_closing_relay().await;
    let mut session = ChatSession::connect(url).await.unwrap();
    session.send("x").await.unwrap();

    let mut updates = Vec::new();
    for _ in 0..100 {
        updates.extend(session.drain_arrived());
        if session.status() == ConnectionStatus::Disconnected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(updates.len(), 2);
    assert_eq!(
        updates[1],
        SessionUpdate::StatusChanged(ConnectionStatus::Disconnected)
    );
    assert!(session.drain_arrived().is_empty());
}

#[tokio::test]
async fn reconnect_keeps_transcript() {
    let server = TestServer::start(MockAIProvider::new()).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.send("before").await.unwrap();
    next_reply(&mut session).await;

    session.close().await.unwrap();
    assert_eq!(session.status(), ConnectionStatus::Disconnected);

    session.reconnect().await.unwrap();
    assert_eq!(session.status(), ConnectionStatus::Connected);
    assert_eq!(session.transcript().len(), 2);

    session.send("after").await.unwrap();
    let reply = next_reply(&mut session).await;

    assert_eq!(reply.text(), "Mock response to: after");
    assert_eq!(session.transcript().len(), 4);
}

#[tokio::test]
async fn server_disconnect_is_reported_and_reconnect_keeps_transcript() {
    let url = start_closing_relay().await;
    let mut session = ChatSession::connect(url).await.unwrap();

    session.send("x").await.unwrap();

    let reply = next_reply(&mut session).await;
    assert_eq!(reply.origin(), Origin::System);
    assert_eq!(reply.text(), "quota exceeded");
    assert_eq!(
        next_update(&mut session).await,
        SessionUpdate::StatusChanged(ConnectionStatus::Disconnected)
    );
    assert_eq!(session.status(), ConnectionStatus::Disconnected);

    session.reconnect().await.unwrap();

    assert_eq!(session.status(), ConnectionStatus::Connected);
    assert_eq!(
        entries(&session),
        vec![
            (Origin::User, "x".to_string()),
            (Origin::System, "quota exceeded".to_string()),
        ]
    );

    // The fresh connection relays again.
    session.send("y").await.unwrap();
    assert_eq!(next_reply(&mut session).await.text(), "quota exceeded");
    assert_eq!(session.transcript().len(), 4);
}

#[tokio::test]
async fn send_after_close_keeps_user_message() {
    let server = TestServer::start(MockAIProvider::new()).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.close().await.unwrap();
    assert!(session.send("lost").await.is_err());

    assert_eq!(entries(&session), vec![(Origin::User, "lost".to_string())]);
}

#[tokio::test]
async fn closed_session_yields_no_more_events() {
    let server = TestServer::start(MockAIProvider::new()).await;
    let mut session = ChatSession::connect(server.ws_url()).await.unwrap();

    session.close().await.unwrap();

    let update = tokio::time::timeout(Duration::from_secs(5), session.next_event())
        .await
        .unwrap();
    assert_eq!(update, None);
}

#[tokio::test]
async fn registry_tracks_open_connections() {
    let server = TestServer::start(MockAIProvider::new()).await;

    let mut first = ChatSession::connect(server.ws_url()).await.unwrap();
    let _second = ChatSession::connect(server.ws_url()).await.unwrap();
    server.wait_for_connections(2).await;

    first.close().await.unwrap();
    server.wait_for_connections(1).await;
}

// =============================================================================
// Raw protocol frames
// =============================================================================

#[tokio::test]
async fn empty_prompt_is_forwarded() {
    let provider = MockAIProvider::new();
    let server = TestServer::start(provider.clone()).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();

    let frame = json!({"event": "ai-message", "data": {"prompt": ""}});
    socket.send(WsMessage::Text(frame.to_string())).await.unwrap();

    let reply = next_frame(&mut socket).await;
    assert_eq!(reply["event"], "ai-response");
    assert_eq!(provider.get_calls(), vec![String::new()]);
}

#[tokio::test]
async fn missing_prompt_gets_ai_error() {
    let provider = MockAIProvider::new();
    let server = TestServer::start(provider.clone()).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();

    let frame = json!({"event": "ai-message", "data": {}});
    socket.send(WsMessage::Text(frame.to_string())).await.unwrap();

    let reply = next_frame(&mut socket).await;
    assert_eq!(reply["event"], "ai-error");
    assert!(reply["data"]["message"].as_str().unwrap().contains("prompt"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn unknown_events_are_ignored() {
    let server = TestServer::start(MockAIProvider::new().with_response("still here")).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();

    let unknown = json!({"event": "typing", "data": {}});
    socket.send(WsMessage::Text(unknown.to_string())).await.unwrap();
    socket.send(WsMessage::Text("not json".to_string())).await.unwrap();
    socket.send(WsMessage::Binary(vec![1, 2, 3])).await.unwrap();
    let prompt = json!({"event": "ai-message", "data": {"prompt": "hi"}});
    socket.send(WsMessage::Text(prompt.to_string())).await.unwrap();

    // The only reply is for the prompt.
    let reply = next_frame(&mut socket).await;
    assert_eq!(
        reply,
        json!({"event": "ai-response", "data": {"text": "still here"}})
    );
}

#[tokio::test]
async fn each_prompt_gets_exactly_one_reply() {
    let server = TestServer::start(MockAIProvider::new()).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();

    for i in 0..5 {
        let frame = json!({"event": "ai-message", "data": {"prompt": format!("p{}", i)}});
        socket.send(WsMessage::Text(frame.to_string())).await.unwrap();
    }

    let mut texts = Vec::new();
    for _ in 0..5 {
        let reply = next_frame(&mut socket).await;
        texts.push(reply["data"]["text"].as_str().unwrap().to_string());
    }
    texts.sort();
    let expected: Vec<String> = (0..5).map(|i| format!("Mock response to: p{}", i)).collect();
    assert_eq!(texts, expected);

    // Nothing else arrives.
    let extra = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(extra.is_err());
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn root_says_hello_world() {
    let server = TestServer::start(MockAIProvider::new()).await;

    let body = reqwest::get(server.http_url("/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "hello world");
}

#[tokio::test]
async fn health_counts_connections() {
    let server = TestServer::start(MockAIProvider::new()).await;
    let _session = ChatSession::connect(server.ws_url()).await.unwrap();
    server.wait_for_connections(1).await;

    let health: HealthResponse = reqwest::get(server.http_url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health, HealthResponse::ok(1, "mock"));
}
