//! Metric tags for HTTP exchanges.
//!
//! A [`TagsProvider`] turns the context of a request (request head, response
//! head, handler, error) into a [`Tags`] set. The default provider emits a
//! fixed set of dimensions and lets [`TagsContributor`]s append their own.

mod context;
mod contributor;
mod outcome;
mod provider;
pub mod web;

use std::collections::BTreeMap;
use std::collections::btree_map;

pub use context::{BestMatchingPattern, ErrorRecord, HandlerRef};
pub use contributor::{HandlerNameContributor, TagsContributor};
pub use outcome::Outcome;
pub use provider::{DefaultTagsProvider, TagsProvider};

/// A single metric dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    /// Create a tag.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A set of tags with unique keys.
///
/// Iteration is ordered by key. Inserting a tag whose key is already present
/// replaces the previous value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tags {
    entries: BTreeMap<String, String>,
}

impl Tags {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, returning the value it replaced, if any.
    pub fn insert(&mut self, tag: Tag) -> Option<String> {
        self.entries.insert(tag.key, tag.value)
    }

    /// Get the value of a tag.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Tag keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a Prometheus label set, sorted by key.
    pub fn to_labels(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl Extend<Tag> for Tags {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = Self::new();
        tags.extend(iter);
        tags
    }
}

/// Owning iterator over the tags of a [`Tags`] set.
#[derive(Debug)]
pub struct IntoIter(btree_map::IntoIter<String, String>);

impl Iterator for IntoIter {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        self.0.next().map(|(key, value)| Tag { key, value })
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter(self.entries.into_iter())
    }
}
