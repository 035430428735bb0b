//! Transcript - ordered, append-only list of chat messages.

use super::{AiReply, Message};

/// In-memory transcript for one client session.
///
/// Entries keep insertion order and are never removed or edited.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns a reference to it.
    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        // Just pushed, so the vec is non-empty.
        &self.messages[self.messages.len() - 1]
    }

    /// Appends the transcript entry for a settled reply.
    ///
    /// Success becomes an `ai` message, failure a `system` message.
    pub fn record_reply(&mut self, reply: AiReply) -> &Message {
        let message = match reply {
            AiReply::Success { text } => Message::ai(text),
            AiReply::Failure { message } => Message::system(message),
        };
        self.push(message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
