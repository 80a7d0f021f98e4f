//! HTTP API of the routescope server.

pub mod error;
pub mod request_id;
mod routes;

use crate::state::AppState;
use axum::routing::get;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

/// Full application: API routes, health check and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(CorsLayer::permissive())
}
