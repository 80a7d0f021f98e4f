//! routescope server - keeps provider keys out of the client

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routescope_server::api;
use routescope_server::config::Config;
use routescope_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("routescope_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting routescope server...");

    let config = Config::from_env();
    if config.tomtom_api_key.is_empty() {
        tracing::warn!("TOMTOM_API_KEY is not set; routing and traffic requests will fail");
    }
    if config.waqi_token.is_empty() {
        tracing::warn!("WAQI_TOKEN is not set; air-quality requests will fail");
    }

    let port = config.server_port;
    let state = Arc::new(AppState::new(config));
    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
