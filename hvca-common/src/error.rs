//! Transport-level error types shared by the HVCA crates.
//!
//! Everything here is fatal from the point of view of the request executor:
//! the only retry boundary for these failures is the caller's own context.

use thiserror::Error;

/// Common error type for transport and context failures.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP request failed (DNS, connect, TLS handshake, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller cancelled the call context
    #[error("Operation cancelled")]
    Cancelled,

    /// The call context deadline passed before the operation finished
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// TLS material could not be loaded
    #[error("Invalid TLS configuration: {0}")]
    InvalidTls(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlatformError {
    /// Check if this error was produced by the call context rather than
    /// the network.
    ///
    /// # Examples
    ///
    /// ```
    /// use hvca_common::PlatformError;
    ///
    /// assert!(PlatformError::Cancelled.is_context_error());
    /// assert!(!PlatformError::invalid_input("bad").is_context_error());
    /// ```
    #[must_use]
    pub const fn is_context_error(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Check if this error is a transport timeout reported by the HTTP stack.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout(),
            Self::DeadlineExceeded => true,
            _ => false,
        }
    }

    /// Create an invalid TLS error with the given message.
    #[must_use]
    pub fn invalid_tls(msg: impl Into<String>) -> Self {
        Self::InvalidTls(msg.into())
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_errors() {
        assert!(PlatformError::Cancelled.is_context_error());
        assert!(PlatformError::DeadlineExceeded.is_context_error());
        assert!(!PlatformError::invalid_tls("x").is_context_error());
    }

    #[test]
    fn test_deadline_is_timeout() {
        assert!(PlatformError::DeadlineExceeded.is_timeout());
        assert!(!PlatformError::Cancelled.is_timeout());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(PlatformError::Cancelled.to_string(), "Operation cancelled");
        assert_eq!(
            PlatformError::invalid_tls("no key").to_string(),
            "Invalid TLS configuration: no key"
        );
    }
}
