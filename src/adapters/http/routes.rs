//! Application router.

use std::path::Path;

use axum::{
    routing::{get, get_service},
    Router,
};
use http::{header, HeaderValue, Method};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::adapters::websocket::{websocket_router, RelayState};
use crate::config::ServerConfig;

use super::handlers::{health, hello};

/// Builds the full application router.
///
/// - `GET /` greeting
/// - `GET /health`
/// - `GET /ws` WebSocket relay
/// - everything else from `static_dir`, falling back to its `index.html`
///
/// Fails only if the configured frontend URL is not a valid header value.
pub fn app_router(
    state: RelayState,
    server: &ServerConfig,
) -> Result<Router, header::InvalidHeaderValue> {
    let static_dir = Path::new(&server.static_dir);
    let index = ServeFile::new(static_dir.join("index.html"));
    let static_files = ServeDir::new(static_dir).fallback(index);

    Ok(Router::new()
        .route("/", get(hello))
        .route("/health", get(health))
        .merge(websocket_router())
        .fallback_service(get_service(static_files))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.frontend_url)?)
        .with_state(state))
}

/// CORS for the single configured frontend origin, credentials allowed.
fn cors_layer(frontend_url: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    // Browsers send the origin without a trailing slash.
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}
