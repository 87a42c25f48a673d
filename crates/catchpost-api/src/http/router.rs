//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router: the webhook endpoint and `/health`, traced.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook::receive_update))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
