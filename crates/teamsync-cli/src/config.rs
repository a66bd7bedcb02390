// Environment-derived configuration

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use teamsync_github::{GitHubConfig, DEFAULT_API_URL};
use teamsync_http::HttpConfig;

use crate::error::{CliError, CliResult};

/// Name of the key written to the `GITHUB_OUTPUT` file
pub const CHANGED_OUTPUT_KEY: &str = "teams_yaml_changed";

/// Connection settings read from flags or the environment
#[derive(Args, Debug, Clone, Default)]
pub struct SyncEnv {
    /// Organization login
    #[arg(long, env = "ORG", global = true)]
    pub org: Option<String>,

    /// GitHub token with org and team admin scope
    #[arg(long, env = "TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// File that receives the `teams_yaml_changed` output
    #[arg(long, env = "GITHUB_OUTPUT", global = true)]
    pub github_output: Option<PathBuf>,
}

impl SyncEnv {
    /// Build the client configuration, failing before any request is made
    pub fn github_config(&self) -> CliResult<GitHubConfig> {
        let org = required(&self.org, "ORG")?;
        let token = required(&self.token, "TOKEN")?;
        let config = GitHubConfig::new(org, token)
            .with_api_url(self.api_url.clone())
            .with_http(HttpConfig::default());
        config.validate()?;
        Ok(config)
    }
}

fn required(value: &Option<String>, name: &str) -> CliResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CliError::Config(format!(
            "Missing required env var: {}",
            name
        ))),
    }
}

/// Append `teams_yaml_changed=true|false` to the output file
pub fn write_changed_output(path: &Path, changed: bool) -> CliResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", CHANGED_OUTPUT_KEY, changed)?;
    tracing::debug!(path = %path.display(), changed, "Wrote changed signal");
    Ok(())
}
