//! ChatSession - one WebSocket connection plus its transcript.

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

use crate::adapters::websocket::{ClientEvent, ServerEvent};
use crate::domain::chat::{ConnectionStatus, Message, Transcript};
use crate::domain::foundation::StateMachine;

use super::{normalize_input, ClientError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// What the reader task hands to the session.
#[derive(Debug)]
enum Inbound {
    Event(ServerEvent),
    Closed,
}

/// A change the front end should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A server reply was appended to the transcript.
    Appended(Message),
    StatusChanged(ConnectionStatus),
}

/// Client side of one relay conversation.
///
/// The socket and its reader task live exactly as long as the session (or
/// until [`close`](Self::close)). Sends never wait for replies; replies are
/// pulled with [`next_event`](Self::next_event) in arrival order.
pub struct ChatSession {
    url: String,
    sink: WsSink,
    inbound: mpsc::UnboundedReceiver<Inbound>,
    reader: JoinHandle<()>,
    transcript: Transcript,
    status: ConnectionStatus,
}

impl ChatSession {
    /// Opens a connection to the relay at `url` (e.g. `ws://localhost:3000/ws`).
    pub async fn connect(url: impl Into<String>) -> Result<Self, ClientError> {
        let url = url.into();
        let (sink, inbound, reader) = open(&url).await?;
        tracing::info!(url = %url, "Connected to relay");

        Ok(Self {
            url,
            sink,
            inbound,
            reader,
            transcript: Transcript::new(),
            status: ConnectionStatus::Connected,
        })
    }

    /// Sends user input as a prompt.
    ///
    /// Returns `Ok(false)` without touching the transcript or the wire when
    /// the input is blank. Otherwise the `user` message is appended first,
    /// so it stays in the transcript even if transmitting fails.
    pub async fn send(&mut self, input: &str) -> Result<bool, ClientError> {
        let Some(prompt) = normalize_input(input) else {
            return Ok(false);
        };

        self.transcript.push(Message::user(prompt));

        if !self.status.is_connected() {
            return Err(ClientError::NotConnected);
        }

        let frame = ClientEvent::prompt(prompt).encode()?;
        self.sink.send(WsMessage::Text(frame)).await?;
        tracing::debug!(prompt_len = prompt.len(), "Prompt sent");
        Ok(true)
    }

    /// Waits for the next server reply or status change.
    ///
    /// Returns `None` once the connection is closed and every reply received
    /// before that has been delivered.
    pub async fn next_event(&mut self) -> Option<SessionUpdate> {
        match self.inbound.recv().await {
            Some(Inbound::Event(event)) => Some(self.apply(event)),
            Some(Inbound::Closed) | None => self.mark_disconnected(),
        }
    }

    /// Applies every update that has already arrived, without waiting.
    ///
    /// Call before appending new local input so the transcript keeps
    /// arrival order.
    pub fn drain_arrived(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.inbound.try_recv() {
                Ok(Inbound::Event(event)) => updates.push(self.apply(event)),
                Ok(Inbound::Closed) | Err(TryRecvError::Disconnected) => {
                    updates.extend(self.mark_disconnected());
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        updates
    }

    /// Replaces the connection with a fresh one, keeping the transcript.
    pub async fn reconnect(&mut self) -> Result<(), ClientError> {
        self.reader.abort();
        // The old socket may already be gone.
        let _ = self.sink.close().await;

        let (sink, inbound, reader) = open(&self.url).await?;
        self.sink = sink;
        self.inbound = inbound;
        self.reader = reader;
        self.status = ConnectionStatus::Connected;

        tracing::info!(url = %self.url, "Reconnected to relay");
        Ok(())
    }

    /// Closes the connection. Replies still in flight are lost.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        let result = self.sink.close().await;
        self.reader.abort();
        self.mark_disconnected();
        result.map_err(ClientError::from)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn apply(&mut self, event: ServerEvent) -> SessionUpdate {
        let message = self.transcript.record_reply(event.into_reply()).clone();
        SessionUpdate::Appended(message)
    }

    fn mark_disconnected(&mut self) -> Option<SessionUpdate> {
        let next = self
            .status
            .transition_to(ConnectionStatus::Disconnected)
            .ok()?;
        self.status = next;
        tracing::info!(url = %self.url, "Disconnected from relay");
        Some(SessionUpdate::StatusChanged(next))
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Connects and spawns the reader task.
async fn open(
    url: &str,
) -> Result<(WsSink, mpsc::UnboundedReceiver<Inbound>, JoinHandle<()>), ClientError> {
    let (stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::connect(url, e))?;
    let (sink, stream) = stream.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(read_frames(stream, tx));
    Ok((sink, rx, reader))
}

/// Decodes server frames until the socket closes.
async fn read_frames(mut stream: SplitStream<WsStream>, tx: mpsc::UnboundedSender<Inbound>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => match ServerEvent::decode(&text) {
                Ok(event) => {
                    if tx.send(Inbound::Event(event)).is_err() {
                        return;
                    }
                }
                Err(e) => tracing::warn!("Dropping server frame: {}", e),
            },
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Receive error: {}", e);
                break;
            }
        }
    }
    let _ = tx.send(Inbound::Closed);
}
