//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::tags::ErrorRecord;

/// Application errors.
///
/// Responses built from an `AppError` carry an [`ErrorRecord`] extension so
/// request metrics can report the failure in the `exception` tag. Internal
/// errors created with [`AppError::internal`] report the wrapped error's type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal {
        #[source]
        source: anyhow::Error,
        /// The concrete error, when known before it was erased into `source`.
        cause: Option<ErrorRecord>,
    },

    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Wrap a concrete error as an internal error, keeping its type for metrics.
    pub fn internal<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let cause = ErrorRecord::new(&error);
        AppError::Internal {
            source: anyhow::Error::new(error),
            cause: Some(cause),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The record attached to this error's response.
    fn record(&self) -> ErrorRecord {
        match self {
            AppError::Internal {
                cause: Some(cause), ..
            } => cause.clone(),
            _ => ErrorRecord::new(self),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(source: anyhow::Error) -> Self {
        AppError::Internal {
            source,
            cause: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let record = self.record();

        let body = match &self {
            AppError::Internal { source, .. } => {
                tracing::error!(error = %source, "internal server error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(record);
        response
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct UpstreamError;

    #[test]
    fn maps_variants_to_status() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BadRequest("id".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::internal(UpstreamError).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_carries_error_record() {
        let response = AppError::BadRequest("id must be numeric".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let record = response.extensions().get::<ErrorRecord>().unwrap();
        assert_eq!(record.simple_name(), "AppError");
        assert_eq!(record.message(), "bad request: id must be numeric");
    }

    #[test]
    fn internal_error_reports_wrapped_type() {
        let response = AppError::internal(UpstreamError).into_response();
        let record = response.extensions().get::<ErrorRecord>().unwrap();
        assert_eq!(record.simple_name(), "UpstreamError");
        assert_eq!(record.message(), "connection refused");
    }

    #[test]
    fn erased_internal_error_reports_app_error() {
        let response = AppError::from(anyhow::anyhow!("db password wrong")).into_response();
        let record = response.extensions().get::<ErrorRecord>().unwrap();
        assert_eq!(record.simple_name(), "AppError");
        assert_eq!(record.message(), "internal server error");
    }

    #[test]
    fn source_chain_is_kept() {
        let err = AppError::internal(UpstreamError);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection refused");
    }
}
