//! WebSocket upgrade handler for chat relay connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Register the connection
//! 2. Relay each `ai-message` to the AI provider on its own task
//! 3. Write replies through a single writer task
//! 4. Deregister on close
//!
//! Prompts on one connection are not serialized, so replies can arrive in a
//! different order than the prompts were sent. Closing the connection does
//! not cancel in-flight AI calls; their replies are dropped.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::application::{RelayPromptCommand, RelayPromptHandler};
use crate::domain::foundation::{ConnectionId, Timestamp};
use crate::ports::AIProvider;

use super::{
    connections::ConnectionRegistry,
    messages::{ClientEvent, DecodeError, ServerEvent},
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct RelayState {
    /// Forwards prompts to the AI provider.
    pub relay: RelayPromptHandler,
    /// Open connections.
    pub connections: Arc<ConnectionRegistry>,
}

impl RelayState {
    /// Create relay state around a provider.
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            relay: RelayPromptHandler::new(provider),
            connections: Arc::new(ConnectionRegistry::new()),
        }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<RelayState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: RelayState) {
    let (mut sender, mut receiver) = socket.split();

    let connection_id = ConnectionId::new();
    state.connections.register(connection_id).await;
    tracing::info!(connection_id = %connection_id, "Connection opened");

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Single writer: owns the sink, drains replies from prompt tasks.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(e) = send_event(&mut sender, &event).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    let relay = state.relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => dispatch(&text, connection_id, &relay, &tx),
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                }
                // Protocol-level ping/pong are answered by axum.
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    if let Some(record) = state.connections.deregister(&connection_id).await {
        let open_secs = Timestamp::now().duration_since(&record.opened_at).num_seconds();
        tracing::info!(connection_id = %connection_id, open_secs, "Connection closed");
    }
}

/// Decode one text frame and act on it.
fn dispatch(
    text: &str,
    connection_id: ConnectionId,
    relay: &RelayPromptHandler,
    tx: &mpsc::UnboundedSender<ServerEvent>,
) {
    match ClientEvent::decode(text) {
        Ok(ClientEvent::AiMessage(request)) => {
            tracing::debug!(
                connection_id = %connection_id,
                prompt_len = request.prompt.len(),
                "Received prompt"
            );
            let relay = relay.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let reply = relay
                    .handle(RelayPromptCommand::new(connection_id, request.prompt))
                    .await;
                let event = ServerEvent::from(reply);
                let name = event.name();
                if tx.send(event).is_err() {
                    tracing::debug!(
                        connection_id = %connection_id,
                        event = name,
                        "Connection closed before reply, dropping"
                    );
                } else {
                    tracing::debug!(connection_id = %connection_id, event = name, "Reply queued");
                }
            });
        }
        Err(DecodeError::InvalidPayload { event, reason }) => {
            tracing::warn!(
                connection_id = %connection_id,
                event = %event,
                "Invalid payload: {}",
                reason
            );
            let reply = ServerEvent::error(format!("invalid {} payload: {}", event, reason));
            // Receiver only gone if the writer already stopped.
            let _ = tx.send(reply);
        }
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, "Ignoring frame: {}", e);
        }
    }
}

/// Send a JSON event over the WebSocket.
async fn send_event(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let json = event.encode().map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Create axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router())
///     .with_state(relay_state);
/// ```
pub fn websocket_router() -> axum::Router<RelayState> {
    use axum::routing::get;

    axum::Router::new().route("/ws", get(ws_handler))
}
