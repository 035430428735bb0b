//! WebSocket event protocol between chat clients and the relay.
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`:
//! - Client → Server: `ai-message` with `{prompt}`
//! - Server → Client: `ai-response` with `{text}`, `ai-error` with `{message}`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chat::{AiReply, FALLBACK_ERROR_MESSAGE};

pub const AI_MESSAGE: &str = "ai-message";
pub const AI_RESPONSE: &str = "ai-response";
pub const AI_ERROR: &str = "ai-error";

/// Why an inbound frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not JSON, or no `event` name.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// Event name this side does not handle.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    /// Known event with a payload of the wrong shape.
    #[error("invalid {event} payload: {reason}")]
    InvalidPayload { event: String, reason: String },
}

/// Untyped frame, split into name and payload before typed decoding.
#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl Envelope {
    fn parse(text: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    fn payload<T: serde::de::DeserializeOwned>(self) -> Result<T, DecodeError> {
        let event = self.event;
        serde_json::from_value(self.data)
            .map_err(|e| DecodeError::InvalidPayload {
                event,
                reason: e.to_string(),
            })
    }
}

// ============================================
// Client → Server
// ============================================

/// Events a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Ask the AI service for a reply.
    #[serde(rename = "ai-message")]
    AiMessage(PromptRequest),
}

/// Payload of `ai-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

impl ClientEvent {
    /// Creates an `ai-message` event.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        ClientEvent::AiMessage(PromptRequest {
            prompt: prompt.into(),
        })
    }

    /// Decodes a text frame received by the server.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope = Envelope::parse(text)?;
        match envelope.event.as_str() {
            AI_MESSAGE => envelope.payload().map(ClientEvent::AiMessage),
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ============================================
// Server → Client
// ============================================

/// Events the relay emits. Exactly one per `ai-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// The AI service replied.
    #[serde(rename = "ai-response")]
    AiResponse(AiResponsePayload),

    /// The AI request failed.
    #[serde(rename = "ai-error")]
    AiError(AiErrorPayload),
}

/// Payload of `ai-response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponsePayload {
    pub text: String,
}

/// Payload of `ai-error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiErrorPayload {
    #[serde(default = "fallback_message")]
    pub message: String,
}

fn fallback_message() -> String {
    FALLBACK_ERROR_MESSAGE.to_string()
}

impl ServerEvent {
    /// Creates an `ai-error` event, substituting the fallback for empty text.
    pub fn error(message: impl Into<String>) -> Self {
        AiReply::failure(message).into()
    }

    /// Decodes a text frame received by a client.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope = Envelope::parse(text)?;
        match envelope.event.as_str() {
            AI_RESPONSE => envelope.payload().map(ServerEvent::AiResponse),
            AI_ERROR => {
                let payload: AiErrorPayload = envelope.payload()?;
                Ok(ServerEvent::error(payload.message))
            }
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::AiResponse(_) => AI_RESPONSE,
            ServerEvent::AiError(_) => AI_ERROR,
        }
    }

    /// Converts back into the domain reply.
    pub fn into_reply(self) -> AiReply {
        match self {
            ServerEvent::AiResponse(p) => AiReply::success(p.text),
            ServerEvent::AiError(p) => AiReply::failure(p.message),
        }
    }
}

impl From<AiReply> for ServerEvent {
    fn from(reply: AiReply) -> Self {
        match reply {
            AiReply::Success { text } => ServerEvent::AiResponse(AiResponsePayload { text }),
            AiReply::Failure { message } => ServerEvent::AiError(AiErrorPayload { message }),
        }
    }
}
