//! HTTP route handlers.

pub mod demo;
pub mod metrics;

use axum::Router;

use crate::middleware::{RequestMetrics, record_request_metrics};

/// Build the application router with request metrics installed.
pub fn app(state: RequestMetrics) -> Router {
    Router::new()
        .merge(demo::router())
        .merge(metrics::router())
        // Router::layer runs after routing, so MatchedPath is visible.
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            record_request_metrics,
        ))
        .with_state(state)
}
