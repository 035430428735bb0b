//! Adapters - Implementations of port interfaces and transport edges.
//!
//! - `ai` - AI provider clients (Gemini, OpenAI, mock)
//! - `http` - Page server, health endpoint, application router
//! - `websocket` - Relay connections and the event protocol

pub mod ai;
pub mod http;
pub mod websocket;
