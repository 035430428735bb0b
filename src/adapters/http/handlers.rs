//! HTTP handlers.

use axum::{extract::State, Json};

use crate::adapters::websocket::RelayState;

use super::dto::HealthResponse;

/// `GET /` - plain-text greeting.
pub async fn hello() -> &'static str {
    "hello world"
}

/// `GET /health` - liveness plus connection count.
pub async fn health(State(state): State<RelayState>) -> Json<HealthResponse> {
    let connections = state.connections.count().await;
    Json(HealthResponse::ok(connections, state.relay.provider_name()))
}
