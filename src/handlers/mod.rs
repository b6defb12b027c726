pub mod health;
pub mod rpc;

pub use health::{health_handler, ready_handler, status_handler};
pub use rpc::{rpc_handler, unsupported_verb};

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Routes shared by the binary and integration tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route(
            "/",
            get(status_handler)
                .post(rpc_handler)
                .fallback(unsupported_verb),
        )
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
