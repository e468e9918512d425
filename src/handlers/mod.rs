mod health;
mod metrics;
mod proxy;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use proxy::proxy_handler;

use axum::{
    Router,
    http::StatusCode,
    routing::{any, get},
};
use std::sync::Arc;
use crate::error::INVALID_ENDPOINT;
use crate::state::AppState;

// anything but the proxy route
pub async fn invalid_endpoint() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, INVALID_ENDPOINT)
}

/// Public router: exactly one route, everything else is a 404.
/// Any method reaches the handler; a bodiless GET fails parsing like any other.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/proxy", any(proxy_handler))
        .fallback(invalid_endpoint)
        .with_state(state)
}

// Operational endpoints, served on their own listener
pub fn ops_router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(invalid_endpoint)
}
