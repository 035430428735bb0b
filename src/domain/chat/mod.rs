//! Chat domain.
//!
//! A client session keeps an ordered [`Transcript`] of [`Message`]s. Every
//! prompt relayed to the AI service settles into exactly one [`AiReply`].

mod connection_status;
mod message;
mod reply;
mod transcript;

pub use connection_status::ConnectionStatus;
pub use message::{Message, Origin};
pub use reply::{AiReply, FALLBACK_ERROR_MESSAGE};
pub use transcript::Transcript;
