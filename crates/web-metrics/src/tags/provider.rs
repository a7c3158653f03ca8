//! Tag providers.

use std::sync::Arc;

use axum::http::{request, response};
use tracing::debug;

use super::context::{ErrorRecord, HandlerRef};
use super::contributor::TagsContributor;
use super::{Tag, Tags, web};

/// Produces the tags recorded for HTTP requests.
pub trait TagsProvider: Send + Sync {
    /// Tags for a completed request. Every argument may be absent.
    fn tags(
        &self,
        request: Option<&request::Parts>,
        response: Option<&response::Parts>,
        handler: Option<&HandlerRef>,
        error: Option<&ErrorRecord>,
    ) -> Tags;

    /// Tags for a request that is still being served.
    fn long_request_tags(
        &self,
        request: Option<&request::Parts>,
        handler: Option<&HandlerRef>,
    ) -> Tags;
}

/// The default [`TagsProvider`].
///
/// Completed requests are tagged with `method`, `status`, `outcome`, `uri`
/// and `exception`; long requests with `method` and `uri`. Contributors run
/// in order after the fixed tags and may add or replace tags.
#[derive(Clone, Default)]
pub struct DefaultTagsProvider {
    ignore_trailing_slash: bool,
    contributors: Vec<Arc<dyn TagsContributor>>,
}

impl DefaultTagsProvider {
    /// Create a provider.
    ///
    /// When `ignore_trailing_slash` is set, a trailing `/` on the matched
    /// route pattern is dropped from the `uri` tag.
    pub fn new(ignore_trailing_slash: bool, contributors: Vec<Arc<dyn TagsContributor>>) -> Self {
        Self {
            ignore_trailing_slash,
            contributors,
        }
    }

    /// Create a provider that keeps trailing slashes.
    pub fn with_contributors(contributors: Vec<Arc<dyn TagsContributor>>) -> Self {
        Self::new(false, contributors)
    }

    /// Append a contributor.
    pub fn with_contributor(mut self, contributor: impl TagsContributor + 'static) -> Self {
        self.contributors.push(Arc::new(contributor));
        self
    }

    pub fn ignores_trailing_slash(&self) -> bool {
        self.ignore_trailing_slash
    }

    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }
}

impl TagsProvider for DefaultTagsProvider {
    fn tags(
        &self,
        request: Option<&request::Parts>,
        response: Option<&response::Parts>,
        handler: Option<&HandlerRef>,
        error: Option<&ErrorRecord>,
    ) -> Tags {
        let mut tags: Tags = [
            web::method(request),
            web::uri(request, response, self.ignore_trailing_slash),
            web::exception(error),
            web::status(response),
            web::outcome(response),
        ]
        .into_iter()
        .collect();

        for contributor in &self.contributors {
            merge(&mut tags, contributor.tags(request, response, handler, error));
        }

        tags
    }

    fn long_request_tags(
        &self,
        request: Option<&request::Parts>,
        handler: Option<&HandlerRef>,
    ) -> Tags {
        let mut tags: Tags = [
            web::method(request),
            web::uri(request, None, self.ignore_trailing_slash),
        ]
        .into_iter()
        .collect();

        for contributor in &self.contributors {
            merge(&mut tags, contributor.long_request_tags(request, handler));
        }

        tags
    }
}

impl std::fmt::Debug for DefaultTagsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTagsProvider")
            .field("ignore_trailing_slash", &self.ignore_trailing_slash)
            .field("contributors", &self.contributors.len())
            .finish()
    }
}

/// Merge contributed tags into `tags`; later values win.
fn merge(tags: &mut Tags, contributed: Vec<Tag>) {
    for tag in contributed {
        let key = tag.key().to_owned();
        if let Some(previous) = tags.insert(tag) {
            debug!(key = %key, previous = %previous, "contributed tag replaced existing value");
        }
    }
}
