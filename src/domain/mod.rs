//! Domain layer - the vocabulary of the chat relay.
//!
//! - `foundation` - identifiers, timestamps, state machine contract
//! - `chat` - transcript messages, AI replies, connection status

pub mod chat;
pub mod foundation;
