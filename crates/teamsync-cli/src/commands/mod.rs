// Command handlers for the teamsync CLI

pub mod apply;
pub mod export;
pub mod validate;

use teamsync_github::GitHubClient;

use crate::config::SyncEnv;
use crate::error::CliResult;

/// Build the GitHub client for a command; configuration errors surface before any request
pub(crate) fn connect(env: &SyncEnv) -> CliResult<GitHubClient> {
    let config = env.github_config()?;
    Ok(GitHubClient::new(&config)?)
}
