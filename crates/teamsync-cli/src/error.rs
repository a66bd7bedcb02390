// CLI errors and exit codes

use teamsync_github::GitHubError;
use teamsync_teams::TeamError;
use thiserror::Error;

/// Exit code for configuration, manifest and domain failures
pub const EXIT_FATAL: i32 = 2;

/// Exit code for transport failures (network, retries exhausted, rate limit)
pub const EXIT_TRANSPORT: i32 = 1;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Team(#[from] TeamError),
}

impl From<GitHubError> for CliError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::ConfigError(msg) => CliError::Config(msg),
            other => CliError::Team(TeamError::GitHub(other)),
        }
    }
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Team(e) if e.is_transport() => EXIT_TRANSPORT,
            _ => EXIT_FATAL,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(msg) => format!(
                "Configuration error: {}\n\nSet ORG and TOKEN in the environment or a .env file.",
                msg
            ),
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Team(TeamError::GitHub(GitHubError::RateLimitExceeded)) => {
                "GitHub API rate limit exceeded. Wait for the limit to reset and run again."
                    .to_string()
            }
            CliError::Team(TeamError::InvalidManifest(msg)) => msg.clone(),
            CliError::Team(e) => e.to_string(),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use teamsync_http::HttpError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("ORG".into()).exit_code(), 2);
        assert_eq!(CliError::from(TeamError::UnknownUser("ghost".into())).exit_code(), 2);
        assert_eq!(CliError::from(GitHubError::RateLimitExceeded).exit_code(), 1);
        assert_eq!(CliError::from(GitHubError::api_error(500, "boom")).exit_code(), 1);
        assert_eq!(
            CliError::from(GitHubError::Http(HttpError::RetryLimitExceeded {
                attempts: 3,
                last_error: "503".into()
            }))
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_github_config_error_becomes_config() {
        let err = CliError::from(GitHubError::config_error("GitHub token is required"));
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
