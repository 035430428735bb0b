use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_relay::adapters::ai::provider_from_config;
use chat_relay::adapters::http::app_router;
use chat_relay::adapters::websocket::RelayState;
use chat_relay::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("invalid configuration")?;

    let provider = provider_from_config(&config.ai).context("failed to build AI provider")?;
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "AI provider ready");

    let state = RelayState::new(Arc::clone(&provider));
    let app = app_router(state, &config.server).context("invalid frontend origin")?;

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Chat relay listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
