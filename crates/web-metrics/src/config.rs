//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result, bail};

use crate::metrics::DEFAULT_REQUESTS_NAME;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Base name of the request metrics (default: http_server_requests).
    pub requests_metric_name: String,

    /// Drop a trailing slash from matched route patterns (default: false).
    pub ignore_trailing_slash: bool,

    /// Record completed requests (default: true).
    pub autotime: bool,

    /// Track requests that are still being served (default: true).
    pub long_requests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            requests_metric_name: DEFAULT_REQUESTS_NAME.to_string(),
            ignore_trailing_slash: false,
            autotime: true,
            long_requests: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.parse().context("PORT must be a valid u16")?,
            None => defaults.port,
        };

        let requests_metric_name = lookup("METRICS_REQUESTS_NAME")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.requests_metric_name);

        if !is_valid_metric_name(&requests_metric_name) {
            bail!("METRICS_REQUESTS_NAME is not a valid metric name: {requests_metric_name}");
        }

        let ignore_trailing_slash = flag(
            &lookup,
            "METRICS_IGNORE_TRAILING_SLASH",
            defaults.ignore_trailing_slash,
        )?;
        let autotime = flag(&lookup, "METRICS_AUTOTIME", defaults.autotime)?;
        let long_requests = flag(&lookup, "METRICS_LONG_REQUESTS", defaults.long_requests)?;

        Ok(Self {
            port,
            requests_metric_name,
            ignore_trailing_slash,
            autotime,
            long_requests,
        })
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    match lookup(key) {
        Some(value) => parse_flag(&value)
            .with_context(|| format!("{key} must be a boolean (true/false), got {value:?}")),
        None => Ok(default),
    }
}

/// Parse a boolean flag value.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Prometheus metric names: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
