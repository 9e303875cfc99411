//! HVCA error types using thiserror 2.0.
//!
//! Provides HVCA-specific errors with retryability classification
//! and integration with the shared platform errors.

use hvca_common::PlatformError;
use reqwest::StatusCode;
use thiserror::Error;

/// Description used when an error response cannot be interpreted.
pub const UNKNOWN_API_ERROR: &str = "unknown API error";

/// A structured error returned by the HVCA API.
///
/// Compared by value, so callers can match against well-known errors such
/// as [`ApiError::token_expired`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("API error {status}: {description}")]
pub struct ApiError {
    /// HTTP status code of the response
    pub status: u16,
    /// Server-supplied description
    pub description: String,
}

impl ApiError {
    /// Create an API error.
    #[must_use]
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
        }
    }

    /// Error for a response whose body could not be interpreted.
    #[must_use]
    pub fn unknown(status: u16) -> Self {
        Self::new(status, UNKNOWN_API_ERROR)
    }

    /// The error HVCA returns when a bearer token is no longer accepted.
    #[must_use]
    pub fn token_expired() -> Self {
        Self::new(StatusCode::UNAUTHORIZED.as_u16(), "Token expired")
    }

    /// The HTTP status as a typed value.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }

    /// 404 Not Found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// 401 Unauthorized.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 422 Unprocessable Entity, returned for requests that break policy.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        self.status == 422
    }

    /// 503 Service Unavailable or 202 Accepted.
    ///
    /// HVCA answers 202 when a result is not ready yet; it is retried exactly
    /// like 503 even though the two mean different things.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.status, 202 | 503)
    }
}

/// HVCA client errors.
#[derive(Error, Debug)]
pub enum HvcaError {
    /// Transport or call-context failure
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Non-2xx (or 202) response from the API
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body could not be deserialized
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Response carried an unexpected content type
    #[error("Unexpected content type: expected {expected}, got {found:?}")]
    UnexpectedContentType {
        /// Content type the decoder requires
        expected: &'static str,
        /// Content type the server sent, if any
        found: Option<String>,
    },

    /// Missing or malformed `Total-Count` header
    #[error("Invalid Total-Count header: {0}")]
    TotalCount(String),

    /// Missing or malformed `Location` header
    #[error("Invalid Location header: {0}")]
    Location(String),

    /// Operation descriptor is not executable
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration or key file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for HVCA operations.
pub type HvcaResult<T> = Result<T, HvcaError>;

impl HvcaError {
    /// Check if the executor would retry this error within its budget.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// The API error carried by this error, if any.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this error came from a cancelled or expired call context.
    #[must_use]
    pub const fn is_context_error(&self) -> bool {
        match self {
            Self::Platform(e) => e.is_context_error(),
            _ => false,
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid operation error.
    #[must_use]
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}

impl From<reqwest::Error> for HvcaError {
    fn from(err: reqwest::Error) -> Self {
        Self::Platform(PlatformError::Http(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HvcaError::from(ApiError::new(404, "Certificate not found"));
        assert_eq!(err.to_string(), "API error 404: Certificate not found");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(HvcaError::from(ApiError::unknown(503)).is_retryable());
        assert!(HvcaError::from(ApiError::unknown(202)).is_retryable());
        assert!(!HvcaError::from(ApiError::unknown(500)).is_retryable());
        assert!(!HvcaError::from(ApiError::token_expired()).is_retryable());
        assert!(!HvcaError::TotalCount("x".to_string()).is_retryable());
    }

    #[test]
    fn test_api_error_equality() {
        let err = HvcaError::from(ApiError::new(401, "Token expired"));
        assert_eq!(err.api_error(), Some(&ApiError::token_expired()));
        assert!(err.api_error().is_some_and(ApiError::is_unauthorized));
    }

    #[test]
    fn test_from_platform_error() {
        let err: HvcaError = PlatformError::Cancelled.into();
        assert!(matches!(err, HvcaError::Platform(_)));
        assert!(err.is_context_error());
    }

    #[test]
    fn test_header_errors_are_distinct_from_decode() {
        let decode = serde_json::from_str::<u32>("x").unwrap_err();
        assert!(matches!(HvcaError::Decode(decode), HvcaError::Decode(_)));
        assert!(!matches!(
            HvcaError::TotalCount("abc".to_string()),
            HvcaError::Decode(_)
        ));
    }
}
