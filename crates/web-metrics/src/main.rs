//! Web Metrics demo server
//!
//! Serves a handful of routes with request metrics installed and exposes
//! them at `/metrics`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use web_metrics::{Config, HandlerNameContributor, RequestMetrics, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting web-metrics demo");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        port = config.port,
        requests_metric = %config.requests_metric_name,
        ignore_trailing_slash = config.ignore_trailing_slash,
        autotime = config.autotime,
        long_requests = config.long_requests,
        "Configuration loaded"
    );

    let state = RequestMetrics::from_config(&config, vec![Arc::new(HandlerNameContributor)]);

    let app = routes::app(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
