#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Tests for the default tags provider.

use std::sync::Arc;

use web_metrics::{DefaultTagsProvider, TagsContributor, TagsProvider};
use web_metrics_test_utils::{
    NamedTagsContributor, key_set, mock_handler, mock_request, mock_response, tag_keys,
    test_failure,
};

fn alpha_bravo_charlie() -> Vec<Arc<dyn TagsContributor>> {
    vec![
        Arc::new(NamedTagsContributor::new(&["alpha"])),
        Arc::new(NamedTagsContributor::new(&["bravo", "charlie"])),
    ]
}

#[test]
fn when_tags_are_provided_then_default_tags_are_present() {
    let tags = DefaultTagsProvider::default().tags(None, None, None, None);
    assert_eq!(
        tag_keys(&tags),
        key_set(&["exception", "method", "outcome", "status", "uri"])
    );
}

#[test]
fn given_contributors_when_tags_are_provided_then_default_and_contributed_tags_are_present() {
    let provider = DefaultTagsProvider::with_contributors(alpha_bravo_charlie());
    let tags = provider.tags(None, None, None, None);
    assert_eq!(
        tag_keys(&tags),
        key_set(&[
            "exception", "method", "outcome", "status", "uri", "alpha", "bravo", "charlie",
        ])
    );
}

#[test]
fn when_long_request_tags_are_provided_then_default_tags_are_present() {
    let tags = DefaultTagsProvider::default().long_request_tags(None, None);
    assert_eq!(tag_keys(&tags), key_set(&["method", "uri"]));
}

#[test]
fn given_contributors_when_long_request_tags_are_provided_then_contributed_tags_are_added() {
    let provider = DefaultTagsProvider::with_contributors(alpha_bravo_charlie());
    let tags = provider.long_request_tags(None, None);
    assert_eq!(
        tag_keys(&tags),
        key_set(&["method", "uri", "alpha", "bravo", "charlie"])
    );
}

#[test]
fn trailing_slash_is_included_by_default() {
    let request = mock_request("GET", "/the/uri/")
        .with_pattern("{one}/{two}/")
        .into_parts();
    let tags = DefaultTagsProvider::default().tags(Some(&request), None, None, None);
    assert_eq!(tags.get("uri"), Some("{one}/{two}/"));
}

#[test]
fn trailing_slash_can_be_ignored() {
    let request = mock_request("GET", "/the/uri/")
        .with_pattern("{one}/{two}/")
        .into_parts();
    let tags = DefaultTagsProvider::new(true, Vec::new()).tags(Some(&request), None, None, None);
    assert_eq!(tags.get("uri"), Some("{one}/{two}"));
}

#[test]
fn long_request_uri_honours_trailing_slash_flag() {
    let request = mock_request("GET", "/the/uri/")
        .with_pattern("{one}/{two}/")
        .into_parts();

    let kept = DefaultTagsProvider::default().long_request_tags(Some(&request), None);
    let trimmed =
        DefaultTagsProvider::new(true, Vec::new()).long_request_tags(Some(&request), None);

    assert_eq!(kept.get("uri"), Some("{one}/{two}/"));
    assert_eq!(trimmed.get("uri"), Some("{one}/{two}"));
}

#[test]
fn completed_request_with_full_context() {
    let request = mock_request("POST", "/orders/7")
        .with_pattern("/orders/{id}")
        .into_parts();
    let response = mock_response(500);
    let handler = mock_handler("update_order");
    let error = test_failure();

    let tags = DefaultTagsProvider::default().tags(
        Some(&request),
        Some(&response),
        Some(&handler),
        Some(&error),
    );

    assert_eq!(tags.get("method"), Some("POST"));
    assert_eq!(tags.get("status"), Some("500"));
    assert_eq!(tags.get("outcome"), Some("SERVER_ERROR"));
    assert_eq!(tags.get("uri"), Some("/orders/{id}"));
    assert_eq!(tags.get("exception"), Some("TestFailure"));
}

#[test]
fn unmatched_request_is_bucketed_by_status() {
    let request = mock_request("GET", "/no/such/page").into_parts();
    let provider = DefaultTagsProvider::default();

    let not_found = provider.tags(Some(&request), Some(&mock_response(404)), None, None);
    assert_eq!(not_found.get("uri"), Some("NOT_FOUND"));
    assert_eq!(not_found.get("outcome"), Some("CLIENT_ERROR"));

    let redirect = provider.tags(Some(&request), Some(&mock_response(308)), None, None);
    assert_eq!(redirect.get("uri"), Some("REDIRECTION"));

    let ok = provider.tags(Some(&request), Some(&mock_response(200)), None, None);
    assert_eq!(ok.get("uri"), Some("UNKNOWN"));

    let root = mock_request("GET", "/").into_parts();
    let root_tags = provider.tags(Some(&root), Some(&mock_response(200)), None, None);
    assert_eq!(root_tags.get("uri"), Some("root"));
}

#[test]
fn contributors_see_the_provider_context() {
    struct TenantContributor;

    impl TagsContributor for TenantContributor {
        fn tags(
            &self,
            request: Option<&axum::http::request::Parts>,
            _response: Option<&axum::http::response::Parts>,
            _handler: Option<&web_metrics::HandlerRef>,
            _error: Option<&web_metrics::ErrorRecord>,
        ) -> Vec<web_metrics::Tag> {
            self.long_request_tags(request, None)
        }

        fn long_request_tags(
            &self,
            request: Option<&axum::http::request::Parts>,
            _handler: Option<&web_metrics::HandlerRef>,
        ) -> Vec<web_metrics::Tag> {
            let tenant = request
                .and_then(|r| r.headers.get("x-tenant"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("anonymous");
            vec![web_metrics::Tag::new("tenant", tenant)]
        }
    }

    let provider = DefaultTagsProvider::default().with_contributor(TenantContributor);
    let request = mock_request("GET", "/")
        .with_header("x-tenant", "acme")
        .into_parts();

    assert_eq!(
        provider
            .tags(Some(&request), None, None, None)
            .get("tenant"),
        Some("acme")
    );
    assert_eq!(
        provider.long_request_tags(None, None).get("tenant"),
        Some("anonymous")
    );
}
