//! Builders for the individual request tags.
//!
//! Each function maps an optional piece of request context to one tag and
//! falls back to a placeholder value when the context is absent.

use axum::http::{StatusCode, request, response};

use super::Tag;
use super::context::{BestMatchingPattern, ErrorRecord};
use super::outcome::Outcome;

pub const METHOD: &str = "method";
pub const STATUS: &str = "status";
pub const OUTCOME: &str = "outcome";
pub const URI: &str = "uri";
pub const EXCEPTION: &str = "exception";

/// Placeholder for a value that could not be determined.
pub const UNKNOWN: &str = "UNKNOWN";

/// `exception` value when the request completed without an error.
pub const NO_EXCEPTION: &str = "None";

const URI_ROOT: &str = "root";
const URI_NOT_FOUND: &str = "NOT_FOUND";
const URI_REDIRECTION: &str = "REDIRECTION";

/// The request method, e.g. `GET`.
pub fn method(request: Option<&request::Parts>) -> Tag {
    match request {
        Some(request) => Tag::new(METHOD, request.method.as_str()),
        None => Tag::new(METHOD, UNKNOWN),
    }
}

/// The response status code, e.g. `200`.
pub fn status(response: Option<&response::Parts>) -> Tag {
    match response {
        Some(response) => Tag::new(STATUS, response.status.as_str()),
        None => Tag::new(STATUS, UNKNOWN),
    }
}

/// The response status class.
pub fn outcome(response: Option<&response::Parts>) -> Tag {
    response
        .map_or(Outcome::Unknown, |response| Outcome::from(response.status))
        .as_tag()
}

/// The matched route pattern.
///
/// Raw request paths are never used as a value; requests without a matched
/// pattern are bucketed into `REDIRECTION`, `NOT_FOUND`, `root` or `UNKNOWN`.
pub fn uri(
    request: Option<&request::Parts>,
    response: Option<&response::Parts>,
    ignore_trailing_slash: bool,
) -> Tag {
    let Some(request) = request else {
        return Tag::new(URI, UNKNOWN);
    };

    if let Some(pattern) = request.extensions.get::<BestMatchingPattern>() {
        let mut pattern = pattern.as_str();
        if ignore_trailing_slash && pattern.len() > 1 {
            pattern = pattern.strip_suffix('/').unwrap_or(pattern);
        }
        if pattern.is_empty() {
            return Tag::new(URI, URI_ROOT);
        }
        return Tag::new(URI, pattern);
    }

    if let Some(response) = response {
        if response.status.is_redirection() {
            return Tag::new(URI, URI_REDIRECTION);
        }
        if response.status == StatusCode::NOT_FOUND {
            return Tag::new(URI, URI_NOT_FOUND);
        }
    }

    if normalized_path(request.uri.path()).is_empty() {
        Tag::new(URI, URI_ROOT)
    } else {
        Tag::new(URI, UNKNOWN)
    }
}

/// The simple type name of the error the handler failed with.
pub fn exception(error: Option<&ErrorRecord>) -> Tag {
    match error {
        Some(error) => Tag::new(EXCEPTION, error.simple_name()),
        None => Tag::new(EXCEPTION, NO_EXCEPTION),
    }
}

/// Collapse repeated slashes and drop a trailing slash.
fn normalized_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }
    if normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}
