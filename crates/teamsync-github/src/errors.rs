//! GitHub Integration Error Types

use teamsync_http::HttpError;
use thiserror::Error;

/// Errors that can occur during GitHub operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport failure after the retry budget was spent, or before any response
    #[error("GitHub transport error: {0}")]
    Http(#[from] HttpError),

    /// Non-success response from the API
    #[error("GitHub API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Rate limit exceeded
    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GitHubError {
    /// Create a new API error
    pub fn api_error(status: u16, msg: impl Into<String>) -> Self {
        GitHubError::ApiError {
            status,
            message: msg.into(),
        }
    }

    /// Create a new config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        GitHubError::ConfigError(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        GitHubError::NotFound(msg.into())
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GitHubError::RateLimitExceeded)
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::NotFound(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, GitHubError::ConfigError(_))
    }

    /// Status code carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::ApiError { status, .. } => Some(*status),
            GitHubError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;
