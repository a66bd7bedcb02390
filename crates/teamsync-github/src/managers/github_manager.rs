//! GitHub client - configuration, authentication and pagination

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use teamsync_http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use teamsync_http::{HttpClient, HttpClientTrait, HttpConfig, HttpRequest, HttpResponse, Method};
use tracing::{debug, info};

use crate::errors::{GitHubError, Result};

/// Default REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version pinned in every request
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// GitHub caps `per_page` at this value
pub const MAX_PER_PAGE: u32 = 100;

/// GitHub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Organization login
    pub org: String,
    /// GitHub API token
    pub token: String,
    /// REST base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Value of the X-GitHub-Api-Version header
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Page size for list endpoints
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

impl GitHubConfig {
    /// Create a new GitHub configuration
    pub fn new(org: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            token: token.into(),
            api_url: default_api_url(),
            api_version: default_api_version(),
            per_page: default_per_page(),
            http: HttpConfig::default(),
        }
    }

    /// Point the client at another REST endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the page size for list endpoints
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Replace the transport settings
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.org.trim().is_empty() {
            return Err(GitHubError::config_error("Organization is required"));
        }
        if self.token.trim().is_empty() {
            return Err(GitHubError::config_error("GitHub token is required"));
        }
        if self.api_url.trim().is_empty() {
            return Err(GitHubError::config_error("API URL is required"));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(GitHubError::config_error(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(())
    }
}

/// GitHub REST client scoped to one organization
pub struct GitHubClient {
    http: Arc<dyn HttpClientTrait>,
    api_url: String,
    org: String,
    per_page: u32,
}

impl GitHubClient {
    /// Create a new client from validated configuration
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(config.http.clone(), auth_headers(config)?)?;
        info!(org = %config.org, api_url = %config.api_url, "Creating GitHub client");
        Ok(Self::with_http_client(config, Arc::new(http)))
    }

    /// Create a client over an existing transport
    pub fn with_http_client(config: &GitHubConfig, http: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            org: config.org.clone(),
            per_page: config.per_page,
        }
    }

    /// Organization this client operates on
    pub fn org_name(&self) -> &str {
        &self.org
    }

    pub(crate) fn http(&self) -> &dyn HttpClientTrait {
        self.http.as_ref()
    }

    /// Absolute URL for an org-scoped path such as `members` or `teams/x/members`
    pub(crate) fn org_url(&self, suffix: &str) -> String {
        format!(
            "{}/orgs/{}/{}",
            self.api_url,
            urlencoding::encode(&self.org),
            suffix
        )
    }

    /// Absolute URL for a user
    pub(crate) fn user_url(&self, login: &str) -> String {
        format!("{}/users/{}", self.api_url, urlencoding::encode(login))
    }

    /// Fetch every page of a list endpoint, stopping at the first short page
    pub async fn paginate<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut page: u32 = 1;
        loop {
            let request = HttpRequest::new(Method::GET, url)
                .with_query("per_page", self.per_page)
                .with_query("page", page);
            let response = check(self.http.execute(request).await?)?;
            let batch: Vec<T> = response.json()?;
            let len = batch.len();
            out.extend(batch);
            debug!(url, page, len, "Fetched page");
            if len < self.per_page as usize {
                break;
            }
            page += 1;
        }
        Ok(out)
    }
}

/// Build the headers sent with every request
fn auth_headers(config: &GitHubConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
        .map_err(|_| GitHubError::config_error("GitHub token contains invalid characters"))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_str(&config.api_version)
            .map_err(|_| GitHubError::config_error("Invalid API version"))?,
    );
    Ok(headers)
}

/// True when a 403 response reports an exhausted rate limit
pub(crate) fn is_rate_limited(response: &HttpResponse) -> bool {
    response.status().as_u16() == 403 && response.header("x-ratelimit-remaining") == Some("0")
}

/// Map a non-success response to an error
pub(crate) fn check(response: HttpResponse) -> Result<HttpResponse> {
    if response.status().is_success() {
        return Ok(response);
    }
    if is_rate_limited(&response) {
        return Err(GitHubError::RateLimitExceeded);
    }
    Err(GitHubError::api_error(
        response.status().as_u16(),
        response.text().to_string(),
    ))
}
