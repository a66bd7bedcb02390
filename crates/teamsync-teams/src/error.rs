/// Error types for team reconciliation
use teamsync_github::GitHubError;
use thiserror::Error;

/// Result type for team operations
pub type Result<T> = std::result::Result<T, TeamError>;

/// Errors that can occur while exporting, applying or validating a manifest
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Team slug '{slug}' does not exist in org '{org}'")]
    UnknownTeam { slug: String, org: String },

    #[error("Unknown GitHub user: {0}")]
    UnknownUser(String),

    #[error("Failed {action} {login} on team {slug}: {status} {message}")]
    MutationFailed {
        action: &'static str,
        slug: String,
        login: String,
        status: u16,
        message: String,
    },

    #[error("Invite failed for {login}: {status} {message}")]
    InviteFailed {
        login: String,
        status: u16,
        message: String,
    },

    #[error("{} invalid username(s) found: {}", .0.len(), .0.join(", "))]
    InvalidLogins(Vec<String>),

    #[error("{0}")]
    GitHub(#[from] GitHubError),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TeamError {
    /// True for failures of the remote service itself rather than of the manifest
    /// or of a domain rule: network errors, exhausted retries, rate limits and
    /// unexpected statuses on reads.
    pub fn is_transport(&self) -> bool {
        match self {
            TeamError::GitHub(e) => !e.is_config_error(),
            _ => false,
        }
    }
}
