//! HTTP client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Status codes retried by default: rate limiting and transient server errors
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Methods safe to resend after a transient failure
pub const DEFAULT_RETRY_METHODS: [&str; 5] = ["DELETE", "GET", "HEAD", "OPTIONS", "PUT"];

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Connection timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Maximum retry attempts after the first request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Initial retry delay (exponential backoff)
    #[serde(default = "default_retry_delay")]
    pub retry_delay: Duration,

    /// Upper bound for any single retry delay
    #[serde(default = "default_max_retry_delay")]
    pub max_retry_delay: Duration,

    /// Status codes that trigger a retry
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Methods that may be retried; other requests are sent exactly once
    #[serde(default = "default_retry_methods")]
    pub retry_methods: Vec<String>,

    /// Honor the server's Retry-After header when present
    #[serde(default = "default_respect_retry_after")]
    pub respect_retry_after: bool,

    /// HTTP/HTTPS proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            retry_count: default_retry_count(),
            retry_delay: default_retry_delay(),
            max_retry_delay: default_max_retry_delay(),
            retry_statuses: default_retry_statuses(),
            retry_methods: default_retry_methods(),
            respect_retry_after: default_respect_retry_after(),
            proxy: None,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry count
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Set the initial retry delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// Default value functions for serde
fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_retry_delay() -> Duration {
    Duration::from_secs(120)
}

fn default_retry_statuses() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}

fn default_retry_methods() -> Vec<String> {
    DEFAULT_RETRY_METHODS.iter().map(|m| m.to_string()).collect()
}

fn default_respect_retry_after() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("teamsync/{}", env!("CARGO_PKG_VERSION"))
}
