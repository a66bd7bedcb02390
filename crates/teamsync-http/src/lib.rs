//! HTTP transport for teamsync
//!
//! Provides a mockable, configurable HTTP client used by the GitHub client.
//!
//! ## Features
//!
//! - **Trait-based design**: Mockable via `HttpClientTrait`
//! - **Bounded retry**: Exponential backoff for 429 and 5xx on idempotent methods, honoring `Retry-After`
//! - **Replayable requests**: JSON bodies are kept so retried requests resend them
//! - **Testing support**: Easy mocking with wiremock

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;

pub use client::{HttpClient, HttpClientTrait, HttpRequest, HttpResponse};
pub use config::{HttpConfig, DEFAULT_RETRY_METHODS, DEFAULT_RETRY_STATUSES};
pub use error::{HttpError, Result};
pub use middleware::{parse_retry_after, RetryConfig, RetryMiddleware};

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
