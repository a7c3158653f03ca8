//! Coarse classification of response status codes.

use std::fmt;

use axum::http::StatusCode;

use super::Tag;
use super::web::OUTCOME;

/// Outcome of an HTTP exchange, derived from the status class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Anything outside 100..=599, or no response at all.
    Unknown,
}

impl Outcome {
    /// Classify a numeric status code.
    pub fn for_status(status: u16) -> Self {
        match status {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "INFORMATIONAL",
            Self::Success => "SUCCESS",
            Self::Redirection => "REDIRECTION",
            Self::ClientError => "CLIENT_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// The `outcome` tag for this value.
    pub fn as_tag(self) -> Tag {
        Tag::new(OUTCOME, self.as_str())
    }
}

impl From<StatusCode> for Outcome {
    fn from(status: StatusCode) -> Self {
        Self::for_status(status.as_u16())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
