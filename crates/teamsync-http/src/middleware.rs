//! HTTP middleware for retry logic

use std::time::{Duration, SystemTime};

use reqwest::Method;
use tracing::{debug, warn};

use crate::{config::HttpConfig, error::HttpError, Result};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum retry attempts
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Status codes worth retrying
    pub retry_statuses: Vec<u16>,
    /// Methods that may be resent
    pub retry_methods: Vec<String>,
    /// Prefer the server's Retry-After over computed backoff
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for RetryConfig {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.retry_count,
            initial_delay: config.retry_delay,
            max_delay: config.max_retry_delay,
            backoff_multiplier: 2.0,
            retry_statuses: config.retry_statuses.clone(),
            retry_methods: config.retry_methods.clone(),
            respect_retry_after: config.respect_retry_after,
        }
    }
}

impl RetryConfig {
    /// Calculate delay for given attempt number
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);

        let delay = Duration::from_millis(delay_ms as u64);
        std::cmp::min(delay, self.max_delay)
    }

    /// Delay before retrying after `error` on the given attempt
    pub fn delay_for(&self, attempt: u32, error: &HttpError) -> Duration {
        match error.retry_after() {
            Some(requested) if self.respect_retry_after => std::cmp::min(requested, self.max_delay),
            _ => self.calculate_delay(attempt),
        }
    }

    /// Whether a response status belongs to the retry set
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Whether a request with this method may be sent more than once
    pub fn is_retryable_method(&self, method: &Method) -> bool {
        self.retry_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }
}

/// Parse a Retry-After header value: delta-seconds or an HTTP-date
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = httpdate::parse_http_date(value).ok()?;
    Some(at.duration_since(SystemTime::now()).unwrap_or_default())
}

/// Retry middleware for HTTP operations
pub struct RetryMiddleware {
    config: RetryConfig,
}

impl RetryMiddleware {
    /// Create new retry middleware
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Retry policy in effect
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute operation with retry logic
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("Request succeeded after {attempt} retries");
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !e.is_retryable(&self.config.retry_statuses) {
                        debug!("Non-retryable error: {e}");
                        return Err(e);
                    }

                    if attempt >= self.config.max_attempts {
                        return Err(HttpError::RetryLimitExceeded {
                            attempts: attempt + 1,
                            last_error: e.to_string(),
                        });
                    }

                    let delay = self.config.delay_for(attempt, &e);
                    warn!(
                        "Request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt + 1,
                        self.config.max_attempts + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
