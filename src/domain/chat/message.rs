//! Transcript message value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Typed locally by the user.
    User,
    /// Reply generated by the AI service.
    Ai,
    /// Failure notice produced by the relay.
    System,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Origin::User => "user",
            Origin::Ai => "ai",
            Origin::System => "system",
        };
        write!(f, "{}", s)
    }
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    origin: Origin,
    text: String,
    at: Timestamp,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
            at: Timestamp::now(),
        }
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Origin::User, text)
    }

    /// Creates an AI message.
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Origin::Ai, text)
    }

    /// Creates a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Origin::System, text)
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the entry was appended.
    pub fn at(&self) -> &Timestamp {
        &self.at
    }
}
