//! Extension point for adding tags to the default set.

use axum::http::{request, response};

use super::Tag;
use super::context::{ErrorRecord, HandlerRef};

/// Contributes extra tags alongside the ones a provider emits.
///
/// Receives the same context as the provider. Tags whose key the provider (or
/// an earlier contributor) already emitted replace the earlier value.
pub trait TagsContributor: Send + Sync {
    /// Tags for a completed request.
    fn tags(
        &self,
        request: Option<&request::Parts>,
        response: Option<&response::Parts>,
        handler: Option<&HandlerRef>,
        error: Option<&ErrorRecord>,
    ) -> Vec<Tag>;

    /// Tags for a request that is still being served.
    fn long_request_tags(
        &self,
        request: Option<&request::Parts>,
        handler: Option<&HandlerRef>,
    ) -> Vec<Tag>;
}

/// Adds a `handler` tag naming the handler that served the request.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandlerNameContributor;

impl HandlerNameContributor {
    pub const KEY: &'static str = "handler";

    fn tag(handler: Option<&HandlerRef>) -> Tag {
        Tag::new(Self::KEY, handler.map_or("none", HandlerRef::name))
    }
}

impl TagsContributor for HandlerNameContributor {
    fn tags(
        &self,
        _request: Option<&request::Parts>,
        _response: Option<&response::Parts>,
        handler: Option<&HandlerRef>,
        _error: Option<&ErrorRecord>,
    ) -> Vec<Tag> {
        vec![Self::tag(handler)]
    }

    fn long_request_tags(
        &self,
        _request: Option<&request::Parts>,
        handler: Option<&HandlerRef>,
    ) -> Vec<Tag> {
        vec![Self::tag(handler)]
    }
}
