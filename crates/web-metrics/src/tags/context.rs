//! Context values the tag provider reads from requests and responses.

use std::any::type_name;
use std::sync::Arc;

use axum::extract::MatchedPath;

/// The route pattern the router matched for a request, e.g. `/items/{id}`.
///
/// Stored as a request extension. The metrics middleware copies axum's
/// [`MatchedPath`] into it; tests and other frameworks can insert it directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestMatchingPattern(Arc<str>);

impl BestMatchingPattern {
    pub fn new(pattern: impl Into<Arc<str>>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&MatchedPath> for BestMatchingPattern {
    fn from(matched: &MatchedPath) -> Self {
        Self::new(matched.as_str())
    }
}

/// Name of the handler that served a request.
///
/// Handlers attach it as a response extension, e.g.
/// `(Extension(HandlerRef::new("show_item")), body)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerRef(Arc<str>);

impl HandlerRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The error a handler failed with.
///
/// Captures the error's type name and message so it can travel in response
/// extensions after the error value itself has been turned into a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorRecord {
    type_name: &'static str,
    message: String,
}

impl ErrorRecord {
    /// Record an error value.
    ///
    /// The error must be a concrete type; trait objects have no type name to
    /// report.
    ///
    /// ```compile_fail
    /// let err: Box<dyn std::error::Error + Send + Sync> = "disk full".into();
    /// web_metrics::ErrorRecord::new(&*err);
    /// ```
    pub fn new<E>(error: &E) -> Self
    where
        E: std::error::Error,
    {
        Self {
            type_name: type_name::<E>(),
            message: error.to_string(),
        }
    }

    /// Fully qualified type name, e.g. `web_metrics::error::AppError`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Type name without module path or generic arguments, e.g. `AppError`.
    ///
    /// `Box` and `Arc` wrappers report the error they hold. Falls back to the
    /// full type name when nothing is left after stripping.
    pub fn simple_name(&self) -> &'static str {
        let mut name = self.type_name;
        loop {
            let (base, args) = match name.split_once('<') {
                Some((base, args)) => (base, Some(args)),
                None => (name, None),
            };
            let segment = base.rsplit("::").next().unwrap_or(base).trim();
            match args {
                Some(inner) if matches!(segment, "Box" | "Arc") => {
                    name = inner.strip_suffix('>').unwrap_or(inner);
                }
                _ if segment.is_empty() => return self.type_name,
                _ => return segment,
            }
        }
    }
}
