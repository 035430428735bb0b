//! Response DTOs for the HTTP endpoints.

use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Currently open WebSocket connections.
    pub connections: usize,
    /// Name of the configured AI provider.
    pub provider: String,
}

impl HealthResponse {
    pub fn ok(connections: usize, provider: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            connections,
            provider: provider.into(),
        }
    }
}
