//! HTTP middleware components.
//!
//! Provides request metrics collection.

pub mod request_metrics;

pub use request_metrics::{RequestMetrics, record_request_metrics};
