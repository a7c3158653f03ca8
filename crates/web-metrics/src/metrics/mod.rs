//! Prometheus metrics collection.
//!
//! Records request tag sets produced by a [`TagsProvider`](crate::tags::TagsProvider)
//! and exposes them in Prometheus text format.

use std::time::Duration;

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

use crate::tags::Tags;

/// Label set built from a [`Tags`] value, sorted by key.
pub type TagLabels = Vec<(String, String)>;

/// Default base name for the request metrics.
pub const DEFAULT_REQUESTS_NAME: &str = "http_server_requests";

/// Request metrics.
pub struct Metrics {
    registry: Registry,

    /// Completed request duration, labelled with the completed-request tags.
    pub requests_seconds: Family<TagLabels, Histogram>,

    /// Requests currently being served, labelled with the long-request tags.
    pub active_requests: Family<TagLabels, Gauge>,
}

impl Metrics {
    /// Create a registry whose metrics are named after `requests_name`.
    ///
    /// Registers `<requests_name>_seconds` and `<requests_name>_active`.
    pub fn new(requests_name: &str) -> Self {
        let mut registry = Registry::default();

        let requests_seconds = Family::<TagLabels, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 12))
        });
        registry.register(
            format!("{requests_name}_seconds"),
            "HTTP server request duration in seconds",
            requests_seconds.clone(),
        );

        let active_requests = Family::<TagLabels, Gauge>::default();
        registry.register(
            format!("{requests_name}_active"),
            "HTTP server requests currently being served",
            active_requests.clone(),
        );

        Self {
            registry,
            requests_seconds,
            active_requests,
        }
    }

    /// Record a completed request.
    pub fn record_request(&self, tags: &Tags, duration: Duration) {
        self.requests_seconds
            .get_or_create(&tags.to_labels())
            .observe(duration.as_secs_f64());
    }

    /// Mark a request as in flight until the returned guard is dropped.
    pub fn start_long_request(&self, tags: &Tags) -> ActiveRequest {
        let gauge = self.active_requests.get_or_create(&tags.to_labels()).clone();
        gauge.inc();
        ActiveRequest { gauge }
    }

    /// Encode metrics in Prometheus text format.
    ///
    /// # Panics
    ///
    /// Panics if Prometheus metric encoding to a `String` buffer fails.
    /// The `fmt::Write` impl for `String` is infallible, and tag labels are
    /// plain string pairs that do not produce `fmt::Error`.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        // Prometheus encoding to String buffer is infallible
        #[allow(clippy::expect_used)]
        encode(&mut buffer, &self.registry).expect("encoding metrics");
        buffer
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_NAME)
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}

/// An in-flight request. Decrements the active gauge when dropped.
#[derive(Debug)]
#[must_use = "the request is only counted as active while the guard is alive"]
pub struct ActiveRequest {
    gauge: Gauge,
}

impl Drop for ActiveRequest {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
