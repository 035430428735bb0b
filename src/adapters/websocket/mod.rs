//! WebSocket adapters for the chat relay.
//!
//! ```text
//!  client ──ai-message──▶ recv task ──spawn per prompt──▶ RelayPromptHandler ──▶ AIProvider
//!    ▲                                                          │
//!    └──ai-response / ai-error── writer task ◀── mpsc ──────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Event protocol types
//! - [`connections`] - Registry of open connections
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connections;
pub mod handler;
pub mod messages;

pub use connections::{ConnectionRecord, ConnectionRegistry};
pub use handler::{websocket_router, ws_handler, RelayState};
pub use messages::{
    AiErrorPayload, AiResponsePayload, ClientEvent, DecodeError, PromptRequest, ServerEvent,
};
