//! # API Client
//!
//! Clients for the Sakura Cloud KMS and Secret Manager APIs.
//!
//! Both services share one `reqwest` client, one set of credentials and one
//! rate limiter. Resources never retry on their own; throttling and transient
//! failures are handled once, in [`http::HttpTransport`].

pub mod error;
pub mod http;
pub mod kms;
pub mod secretmanager;
pub mod trace;
pub mod types;

pub use error::ApiError;
pub use http::{ClientOptions, RateLimiter, RetryPolicy};
pub use kms::{KmsApi, KmsRest};
pub use secretmanager::{SecretManagerApi, SecretManagerRest};
pub use trace::TraceMode;

use std::sync::Arc;
use std::time::Duration;

use paths::Service;
use tracing::info;
use zeroize::Zeroizing;

use crate::config::ProviderConfig;
use crate::constants::{CLIENT_RETRY_WAIT_MAX_SECS, CLIENT_RETRY_WAIT_MIN_SECS};
use http::HttpTransport;

impl ClientOptions {
    /// Derive client options from a validated provider configuration
    ///
    /// Zero retry waits select the client defaults (1s / 64s).
    pub fn from_config(config: &ProviderConfig) -> Self {
        let secs = |value: i64, default: u64| match u64::try_from(value) {
            Ok(0) | Err(_) => Duration::from_secs(default),
            Ok(v) => Duration::from_secs(v),
        };
        let wait_min = secs(config.retry_wait_min, CLIENT_RETRY_WAIT_MIN_SECS);
        let wait_max = secs(config.retry_wait_max, CLIENT_RETRY_WAIT_MAX_SECS).max(wait_min);

        Self {
            api_root_url: config.api_root_url.clone(),
            access_token: config.access_token.clone(),
            access_token_secret: Zeroizing::new(config.access_token_secret.to_string()),
            timeout: Duration::from_secs(u64::try_from(config.api_request_timeout).unwrap_or(0)),
            retry: RetryPolicy {
                max_retries: u32::try_from(config.retry_max).unwrap_or(0),
                wait_min,
                wait_max,
            },
            rate_limit: u32::try_from(config.api_request_rate_limit).unwrap_or(0),
            trace: config.trace_mode,
            user_agent: user_agent(config.terraform_version.as_deref()),
        }
    }
}

fn user_agent(terraform_version: Option<&str>) -> String {
    let base = format!("terraform-provider-sakura/{}", env!("CARGO_PKG_VERSION"));
    match terraform_version {
        Some(version) if !version.is_empty() => format!("Terraform/{version} {base}"),
        _ => base,
    }
}

/// Entry point to both services
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub kms: Arc<dyn KmsApi>,
    pub secret_manager: Arc<dyn SecretManagerApi>,
}

impl ApiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        Self::from_options(ClientOptions::from_config(config))
    }

    pub fn from_options(options: ClientOptions) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(ApiError::Client)?;

        let limiter = Arc::new(RateLimiter::new(options.rate_limit));
        let options = Arc::new(options);
        let transport = |service: Service| {
            HttpTransport::new(
                http.clone(),
                service.base_url(&options.api_root_url),
                Arc::clone(&options),
                Arc::clone(&limiter),
            )
        };

        info!(
            api_root_url = %options.api_root_url,
            timeout_secs = options.timeout.as_secs(),
            retry_max = options.retry.max_retries,
            rate_limit = options.rate_limit,
            "API client configured"
        );

        Ok(Self::from_parts(
            Arc::new(KmsRest::new(transport(Service::Kms))),
            Arc::new(SecretManagerRest::new(transport(Service::SecretManager))),
        ))
    }

    /// Assemble a client from arbitrary service implementations
    pub fn from_parts(kms: Arc<dyn KmsApi>, secret_manager: Arc<dyn SecretManagerApi>) -> Self {
        Self {
            kms,
            secret_manager,
        }
    }
}
