//! HTTP adapter - page server, health endpoint and the router that ties
//! the WebSocket relay in.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::HealthResponse;
pub use routes::app_router;
