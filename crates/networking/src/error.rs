//! Error types for outbound HTTP requests

use thiserror::Error;

/// Errors that can occur while performing an HTTP request
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Transport-level failure (DNS, connection refused, timeout, TLS, ...)
    #[error("Request to {url} failed: {source}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body exceeded the configured limit
    #[error("Response from {url} too large: {size} bytes exceeds maximum {max}")]
    TooLarge {
        /// Requested URL
        url: String,
        /// Bytes received (or announced) so far
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

impl NetworkError {
    /// The URL the failed request was sent to, if known
    pub fn url(&self) -> Option<&str> {
        match self {
            NetworkError::Build(_) => None,
            NetworkError::Request { url, .. }
            | NetworkError::Status { url, .. }
            | NetworkError::TooLarge { url, .. } => Some(url),
        }
    }

    /// Check if the failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetworkError::Request { source, .. } if source.is_timeout())
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for networking operations
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let error = NetworkError::Status {
            url: "https://prezi.com/view/abc/".to_string(),
            status: 404,
        };
        let display = error.to_string();
        assert!(display.contains("404"));
        assert!(display.contains("https://prezi.com/view/abc/"));
        assert_eq!(error.status(), Some(404));
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_too_large_error_display() {
        let error = NetworkError::TooLarge {
            url: "https://example.com/big.png".to_string(),
            size: 2_000_000,
            max: 1_000_000,
        };
        assert!(error.to_string().contains("2000000"));
        assert_eq!(error.url(), Some("https://example.com/big.png"));
        assert_eq!(error.status(), None);
    }
}
