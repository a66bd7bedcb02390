//! HTTP client error types

use std::time::Duration;

use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network request failed
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// HTTP error status
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
        /// Server-requested delay before the next attempt, if any
        retry_after: Option<Duration>,
    },

    /// Retry limit exceeded
    #[error("Retry limit exceeded after {attempts} attempts: {last_error}")]
    RetryLimitExceeded { attempts: u32, last_error: String },

    /// Response body could not be decoded
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// Check if error is retryable under the given status policy
    pub fn is_retryable(&self, retry_statuses: &[u16]) -> bool {
        match self {
            // Connection-level failures, not client errors
            HttpError::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            HttpError::Timeout(_) => true,
            HttpError::HttpStatus { status, .. } => retry_statuses.contains(&status.as_u16()),
            _ => false,
        }
    }

    /// Delay the server asked for, if this error carries one
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HttpError::HttpStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            HttpError::HttpStatus { status, .. } => Some(*status),
            HttpError::RequestFailed(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn status_error(code: u16) -> HttpError {
        HttpError::HttpStatus {
            status: StatusCode::from_u16(code).unwrap(),
            message: String::new(),
            retry_after: None,
        }
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = [429, 500, 502, 503, 504];
        assert!(status_error(429).is_retryable(&policy));
        assert!(status_error(503).is_retryable(&policy));
        assert!(!status_error(404).is_retryable(&policy));
        assert!(!status_error(422).is_retryable(&policy));
        assert!(!status_error(501).is_retryable(&policy));
    }

    #[test]
    fn test_timeout_is_retryable() {
        assert!(HttpError::Timeout(Duration::from_secs(1)).is_retryable(&[]));
        assert!(!HttpError::InvalidUrl("x".to_string()).is_retryable(&[429]));
    }
}
