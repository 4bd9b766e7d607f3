//! # HTTP Transport
//!
//! Shared request path for all services: basic auth, rate limiting, retry with
//! Fibonacci backoff, trace logging, and error mapping.

use std::sync::Arc;
use std::time::Duration;

use paths::{Operation, PathBuilder, PathFormat};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::error::ApiError;
use super::trace::TraceMode;

/// Retry policy for throttled and unavailable responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    pub wait_min: Duration,
    pub wait_max: Duration,
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (0-indexed)
    ///
    /// Follows the Fibonacci sequence in units of `wait_min`: 1, 1, 2, 3, 5, 8, ...
    /// capped at `wait_max`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let (mut prev, mut current) = (0u32, 1u32);
        for _ in 0..attempt {
            let next = prev.saturating_add(current);
            prev = current;
            current = next;
        }
        self.wait_min.saturating_mul(current).min(self.wait_max)
    }
}

/// Spaces requests at least `interval` apart
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// `requests_per_second` of zero disables limiting
    pub fn new(requests_per_second: u32) -> Self {
        let interval = if requests_per_second == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / requests_per_second
        };
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Connection settings shared by every service client
#[derive(Clone)]
pub struct ClientOptions {
    pub api_root_url: String,
    pub access_token: String,
    pub access_token_secret: Zeroizing<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub rate_limit: u32,
    pub trace: TraceMode,
    pub user_agent: String,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_root_url", &self.api_root_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("rate_limit", &self.rate_limit)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

/// HTTP transport for one service base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    options: Arc<ClientOptions>,
    limiter: Arc<RateLimiter>,
}

impl HttpTransport {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        options: Arc<ClientOptions>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
            limiter,
        }
    }

    /// Send a request and decode the JSON response body
    pub async fn send<B, R>(
        &self,
        operation: impl Into<Operation>,
        resource_id: Option<&str>,
        body: Option<&B>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let (path, text) = self.execute(operation.into(), resource_id, body).await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { path, source })
    }

    /// Send a request whose response body is ignored
    pub async fn send_empty<B>(
        &self,
        operation: impl Into<Operation>,
        resource_id: Option<&str>,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(operation.into(), resource_id, body)
            .await
            .map(|_| ())
    }

    async fn execute<B>(
        &self,
        operation: Operation,
        resource_id: Option<&str>,
        body: Option<&B>,
    ) -> Result<(String, String), ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut builder = PathBuilder::new(operation);
        if let Some(id) = resource_id {
            builder = builder.resource_id(id);
        }
        let path = builder.build(PathFormat::Relative)?;
        let url = format!("{}{}", self.base_url, path);
        let method = match operation.method() {
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            _ => Method::GET,
        };
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|source| ApiError::Encode {
                path: path.clone(),
                source,
            })?;

        let trace = self.options.trace;
        let retry = self.options.retry;
        let mut attempt = 0u32;

        loop {
            self.limiter.acquire().await;

            if trace.logs_api() {
                info!(method = %method, path = %path, attempt, "API request");
            }
            if trace.logs_http() {
                if let Some(bytes) = &payload {
                    info!(path = %path, body = %String::from_utf8_lossy(bytes), "HTTP request body");
                }
            }

            let mut request = self
                .client
                .request(method.clone(), &url)
                .basic_auth(
                    &self.options.access_token,
                    Some(self.options.access_token_secret.as_str()),
                );
            if let Some(bytes) = &payload {
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let text = response
                        .text()
                        .await
                        .map_err(|source| ApiError::Transport {
                            path: path.clone(),
                            source,
                        })?;

                    if trace.logs_api() {
                        info!(method = %method, path = %path, status = status.as_u16(), "API response");
                    }
                    if trace.logs_http() {
                        info!(path = %path, body = %text, "HTTP response body");
                    }

                    if status.is_success() {
                        return Ok((path, text));
                    }
                    if is_retryable(status) && attempt < retry.max_retries {
                        let wait = retry.backoff(attempt);
                        warn!(
                            path = %path,
                            status = status.as_u16(),
                            attempt,
                            wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                            "retrying request"
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                        continue;
                    }
                    debug!(path = %path, status = status.as_u16(), "request failed");
                    return Err(ApiError::from_response(status, &path, &text));
                }
                Err(source) => {
                    if (source.is_timeout() || source.is_connect()) && attempt < retry.max_retries {
                        let wait = retry.backoff(attempt);
                        warn!(path = %path, attempt, error = %source, "retrying request after transport error");
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(ApiError::Transport { path, source });
                }
            }
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}
