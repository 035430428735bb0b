//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - one-shot text generation against an external AI service

mod ai_provider;

pub use ai_provider::{AIError, AIProvider, ProviderInfo};
