//! Chat Relay - real-time chat between WebSocket clients and a generative AI
//! service.
//!
//! Each `ai-message` a client sends is forwarded to the configured AI
//! provider, and exactly one `ai-response` or `ai-error` comes back on the
//! same connection.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;
