//! HTTP client implementation

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
    middleware::{parse_retry_after, RetryConfig, RetryMiddleware},
};

/// A request description that can be replayed on retry
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Create a request without query or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            json: None,
        }
    }

    /// Append a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Header value as text, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| HttpError::Decode(e.to_string()))
    }

    /// Turn a non-success status into an error
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(HttpError::HttpStatus {
                status: self.status,
                message: self.body,
                retry_after: None,
            })
        }
    }
}

/// Mockable HTTP client trait
///
/// Transient statuses are retried inside `execute` for idempotent methods;
/// every other response is handed back to the caller so it can be classified.
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Execute a request, retrying transient failures of idempotent methods
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute a GET request
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(Method::GET, url)).await
    }

    /// Execute a PUT request without a body
    async fn put(&self, url: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(Method::PUT, url)).await
    }

    /// Execute a DELETE request
    async fn delete(&self, url: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(Method::DELETE, url)).await
    }

    /// Execute a POST request with a JSON body
    async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(Method::POST, url).with_json(body))
            .await
    }
}

/// Production HTTP client
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
    retry: RetryMiddleware,
}

impl HttpClient {
    /// Create a new HTTP client with configuration and headers sent on every request
    pub fn new(config: HttpConfig, default_headers: HeaderMap) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(default_headers);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self {
            inner,
            retry: RetryMiddleware::new(RetryConfig::from(&config)),
            config,
        })
    }

    /// Create HTTP client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default(), HeaderMap::new())
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Send a single attempt. With `retryable`, a retry-set status becomes an
    /// error the middleware can act on.
    async fn send_once(
        &self,
        request: &HttpRequest,
        url: &url::Url,
        retryable: bool,
    ) -> Result<HttpResponse> {
        let mut builder = self.inner.request(request.method.clone(), url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.config.timeout)
            } else {
                HttpError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if retryable && self.retry.config().is_retryable_status(status.as_u16()) {
            let retry_after = headers
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            return Err(HttpError::HttpStatus {
                status,
                message: body,
                retry_after,
            });
        }

        Ok(HttpResponse::new(status, headers, body))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request
            .url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        debug!("HTTP {}: {}", request.method, url);
        if !self.retry.config().is_retryable_method(&request.method) {
            // Non-idempotent requests are sent exactly once
            return self.send_once(&request, &url, false).await;
        }
        self.retry.execute(|| self.send_once(&request, &url, true)).await
    }
}
