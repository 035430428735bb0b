//! AiReply - the settled outcome of one relayed prompt.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Shown to the user when a failure carries no usable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "AI request failed";

/// Outcome of relaying one prompt to the AI service.
///
/// Exactly one of these is produced per prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AiReply {
    /// The AI service produced text.
    Success { text: String },
    /// The call failed; `message` is human readable.
    Failure { message: String },
}

impl AiReply {
    /// Creates a success reply.
    pub fn success(text: impl Into<String>) -> Self {
        AiReply::Success { text: text.into() }
    }

    /// Creates a failure reply, substituting [`FALLBACK_ERROR_MESSAGE`] for
    /// an empty message.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        AiReply::Failure { message }
    }

    /// Settles a provider result into a reply.
    pub fn from_result<E: Display>(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
