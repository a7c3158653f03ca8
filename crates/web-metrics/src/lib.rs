//! Web Metrics Library
//!
//! Tags HTTP requests with metric dimensions and records them in Prometheus
//! format. The demo server entry point is the `web-metrics-demo` binary.

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod tags;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use metrics::{ActiveRequest, Metrics};
pub use middleware::{RequestMetrics, record_request_metrics};
pub use tags::{
    BestMatchingPattern, DefaultTagsProvider, ErrorRecord, HandlerNameContributor, HandlerRef,
    Outcome, Tag, Tags, TagsContributor, TagsProvider,
};
