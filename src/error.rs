//! Error types for the JIRA client.

use thiserror::Error;

/// Errors that can occur when talking to the JIRA API.
///
/// No error is retried or recovered internally; every failure surfaces to
/// the caller of the endpoint operation that triggered it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL or a composed request URL could not be constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response could not be interpreted (no readable HTTP payload).
    #[error("invalid response from server")]
    InvalidResponse,

    /// The server answered with a status outside 200-299.
    #[error("server returned HTTP {status}")]
    Server {
        /// The HTTP status code, preserved for the caller to branch on.
        status: u16,
    },

    /// A transport-level failure from the HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response body that is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field was missing or mismatched while decoding an entity.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A required field was absent or of the wrong JSON type.
///
/// Only required fields produce this error; optional fields that are
/// missing or malformed resolve to `None` during decoding instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode {entity}: missing or invalid field '{field}'")]
pub struct DecodeError {
    /// The entity whose decode failed.
    pub entity: &'static str,
    /// The offending field.
    pub field: &'static str,
}

impl DecodeError {
    pub(crate) fn new(entity: &'static str, field: &'static str) -> Self {
        Self { entity, field }
    }
}

/// Two errors of the same kind with the same discriminating payload
/// (status code, or equivalent description) compare equal.
impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ApiError::InvalidUrl(a), ApiError::InvalidUrl(b)) => a == b,
            (ApiError::InvalidResponse, ApiError::InvalidResponse) => true,
            (ApiError::Server { status: a }, ApiError::Server { status: b }) => a == b,
            (ApiError::Network(a), ApiError::Network(b)) => a.to_string() == b.to_string(),
            (ApiError::Json(a), ApiError::Json(b)) => a.to_string() == b.to_string(),
            (ApiError::Decode(a), ApiError::Decode(b)) => a == b,
            _ => false,
        }
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
