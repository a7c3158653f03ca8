//! Web Metrics test utilities.
//!
//! Helpers for testing tag providers: mock request and response heads,
//! a contributor that emits fixed tag names, and key-set assertions.

use std::collections::BTreeSet;

use axum::http::{
    HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri, request, response,
};
use web_metrics::{BestMatchingPattern, ErrorRecord, HandlerRef, Tag, Tags, TagsContributor};

/// Create a mock request with the given method and URI.
///
/// # Panics
///
/// Panics if `method` or `uri` does not parse, so a mistyped fixture fails
/// the test that uses it.
pub fn mock_request(method: &str, uri: &str) -> MockRequest {
    let method = Method::from_bytes(method.as_bytes())
        .unwrap_or_else(|e| panic!("invalid mock request method {method:?}: {e}"));
    let uri = uri
        .parse::<Uri>()
        .unwrap_or_else(|e| panic!("invalid mock request uri {uri:?}: {e}"));

    MockRequest {
        method,
        uri,
        pattern: None,
        headers: Vec::new(),
    }
}

/// A request head builder.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub uri: Uri,
    pub pattern: Option<String>,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl MockRequest {
    /// Set the route pattern the router matched.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.push((name, value));
        }
        self
    }

    /// Build the request head.
    pub fn into_parts(self) -> request::Parts {
        let mut request = Request::new(());
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        for (name, value) in self.headers {
            request.headers_mut().append(name, value);
        }
        if let Some(pattern) = self.pattern {
            request
                .extensions_mut()
                .insert(BestMatchingPattern::new(pattern));
        }
        request.into_parts().0
    }
}

/// Create a response head with the given status.
///
/// Out-of-range codes produce `500`.
pub fn mock_response(status: u16) -> response::Parts {
    let mut response = Response::new(());
    *response.status_mut() =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response.into_parts().0
}

/// Create a handler reference.
pub fn mock_handler(name: &str) -> HandlerRef {
    HandlerRef::new(name)
}

/// An error type for exercising the `exception` tag.
#[derive(Debug)]
pub struct TestFailure;

impl std::fmt::Display for TestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("test failure")
    }
}

impl std::error::Error for TestFailure {}

/// Record a [`TestFailure`].
pub fn test_failure() -> ErrorRecord {
    ErrorRecord::new(&TestFailure)
}

/// A contributor that emits one tag per configured name, each with the
/// value `"value"`.
#[derive(Debug, Clone)]
pub struct NamedTagsContributor {
    names: Vec<String>,
}

impl NamedTagsContributor {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn emit(&self) -> Vec<Tag> {
        self.names
            .iter()
            .map(|name| Tag::new(name.clone(), "value"))
            .collect()
    }
}

impl TagsContributor for NamedTagsContributor {
    fn tags(
        &self,
        _request: Option<&request::Parts>,
        _response: Option<&response::Parts>,
        _handler: Option<&HandlerRef>,
        _error: Option<&ErrorRecord>,
    ) -> Vec<Tag> {
        self.emit()
    }

    fn long_request_tags(
        &self,
        _request: Option<&request::Parts>,
        _handler: Option<&HandlerRef>,
    ) -> Vec<Tag> {
        self.emit()
    }
}

/// The key set of a tag set.
pub fn tag_keys(tags: &Tags) -> BTreeSet<String> {
    tags.keys().map(str::to_string).collect()
}

/// Build an expected key set.
pub fn key_set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|s| s.to_string()).collect()
}
