//! Request metrics middleware.
//!
//! Tags every request with a [`TagsProvider`] and records it in [`Metrics`]:
//! long-request tags while the handler runs, completed-request tags and the
//! elapsed time once it returns.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::trace;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::tags::{
    BestMatchingPattern, DefaultTagsProvider, ErrorRecord, HandlerRef, TagsContributor,
    TagsProvider,
};

/// Shared state for [`record_request_metrics`].
#[derive(Clone)]
pub struct RequestMetrics {
    provider: Arc<dyn TagsProvider>,
    metrics: Arc<Metrics>,
    autotime: bool,
    long_requests: bool,
}

impl RequestMetrics {
    /// Record completed and in-flight requests with `provider` into `metrics`.
    pub fn new(provider: Arc<dyn TagsProvider>, metrics: Arc<Metrics>) -> Self {
        Self {
            provider,
            metrics,
            autotime: true,
            long_requests: true,
        }
    }

    /// Build from configuration with a [`DefaultTagsProvider`].
    pub fn from_config(config: &Config, contributors: Vec<Arc<dyn TagsContributor>>) -> Self {
        let provider = DefaultTagsProvider::new(config.ignore_trailing_slash, contributors);
        Self::new(
            Arc::new(provider),
            Arc::new(Metrics::new(&config.requests_metric_name)),
        )
        .with_autotime(config.autotime)
        .with_long_requests(config.long_requests)
    }

    /// Enable or disable recording of completed requests.
    pub fn with_autotime(mut self, enabled: bool) -> Self {
        self.autotime = enabled;
        self
    }

    /// Enable or disable the in-flight request gauge.
    pub fn with_long_requests(mut self, enabled: bool) -> Self {
        self.long_requests = enabled;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

impl std::fmt::Debug for RequestMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestMetrics")
            .field("autotime", &self.autotime)
            .field("long_requests", &self.long_requests)
            .finish()
    }
}

/// Middleware recording request metrics.
///
/// Must be added with `Router::layer` (which runs after routing) so the
/// matched route pattern is available.
pub async fn record_request_metrics(
    State(state): State<RequestMetrics>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(matched) = request.extensions().get::<MatchedPath>() {
        let pattern = BestMatchingPattern::from(matched);
        request.extensions_mut().insert(pattern);
    }

    let head = request_head(&request);
    let handler = request.extensions().get::<HandlerRef>().cloned();

    // Held until the response is produced; dropping it ends the in-flight count.
    let _active = state.long_requests.then(|| {
        let tags = state
            .provider
            .long_request_tags(Some(&head), handler.as_ref());
        state.metrics.start_long_request(&tags)
    });

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    if !state.autotime {
        return response;
    }

    let (parts, body) = response.into_parts();
    let handler = parts.extensions.get::<HandlerRef>().or(handler.as_ref());
    let error = parts.extensions.get::<ErrorRecord>();

    let tags = state.provider.tags(Some(&head), Some(&parts), handler, error);
    trace!(?tags, elapsed_ms = elapsed.as_millis() as u64, "request recorded");
    state.metrics.record_request(&tags, elapsed);

    Response::from_parts(parts, body)
}

/// Copy the parts of a request that tagging reads, leaving the body behind.
fn request_head(request: &Request) -> request::Parts {
    let mut head = axum::http::Request::new(());
    *head.method_mut() = request.method().clone();
    *head.uri_mut() = request.uri().clone();
    *head.version_mut() = request.version();
    *head.headers_mut() = request.headers().clone();
    if let Some(pattern) = request.extensions().get::<BestMatchingPattern>() {
        head.extensions_mut().insert(pattern.clone());
    }
    head.into_parts().0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Method;

    use super::*;

    #[test]
    fn head_keeps_method_uri_and_pattern() {
        let mut request = axum::http::Request::builder()
            .method(Method::DELETE)
            .uri("/items/9?force=true")
            .header("user-agent", "healthcheck")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(BestMatchingPattern::new("/items/{id}"));

        let head = request_head(&request);
        assert_eq!(head.method, Method::DELETE);
        assert_eq!(head.uri.path(), "/items/9");
        assert_eq!(head.headers["user-agent"], "healthcheck");
        assert_eq!(
            head.extensions.get::<BestMatchingPattern>(),
            Some(&BestMatchingPattern::new("/items/{id}"))
        );
    }

    #[test]
    fn from_config_applies_switches() {
        let config = Config {
            autotime: false,
            long_requests: false,
            ..Config::default()
        };
        let state = RequestMetrics::from_config(&config, Vec::new());
        assert!(!state.autotime);
        assert!(!state.long_requests);
    }
}
