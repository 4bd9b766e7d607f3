//! # Environment Settings
//!
//! Provider settings read from `SAKURACLOUD_*` environment variables.

use std::path::PathBuf;

use super::error::ConfigError;
use crate::constants::{
    ENV_ACCESS_TOKEN, ENV_ACCESS_TOKEN_SECRET, ENV_API_REQUEST_TIMEOUT, ENV_API_ROOT_URL,
    ENV_DEFAULT_ZONE, ENV_PROFILE, ENV_PROFILE_DIR, ENV_RATE_LIMIT, ENV_RETRY_MAX,
    ENV_RETRY_WAIT_MAX, ENV_RETRY_WAIT_MIN, ENV_TRACE, ENV_ZONE, ENV_ZONES,
};

/// Values found in the environment; `None` means the variable is unset or empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub profile: Option<String>,
    pub profile_dir: Option<PathBuf>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub zone: Option<String>,
    pub zones: Option<Vec<String>>,
    pub default_zone: Option<String>,
    pub api_root_url: Option<String>,
    pub retry_max: Option<i64>,
    pub retry_wait_max: Option<i64>,
    pub retry_wait_min: Option<i64>,
    pub api_request_timeout: Option<i64>,
    pub api_request_rate_limit: Option<i64>,
    pub trace: Option<String>,
}

impl EnvSettings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, Vec<ConfigError>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary lookup function
    ///
    /// Integer variables that fail to parse are reported and left unset, so the
    /// next layer's value applies. Every failure is collected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Vec<ConfigError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut errors = Vec::new();
        let mut int = |key: &str| -> Option<i64> {
            let raw = string(key)?;
            match raw.trim().parse::<i64>() {
                Ok(value) => Some(value),
                Err(source) => {
                    errors.push(ConfigError::InvalidEnvValue {
                        var: key.to_string(),
                        value: raw,
                        source,
                    });
                    None
                }
            }
        };

        let retry_max = int(ENV_RETRY_MAX);
        let retry_wait_max = int(ENV_RETRY_WAIT_MAX);
        let retry_wait_min = int(ENV_RETRY_WAIT_MIN);
        let api_request_timeout = int(ENV_API_REQUEST_TIMEOUT);
        let api_request_rate_limit = int(ENV_RATE_LIMIT);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            profile: string(ENV_PROFILE),
            profile_dir: string(ENV_PROFILE_DIR).map(PathBuf::from),
            access_token: string(ENV_ACCESS_TOKEN),
            access_token_secret: string(ENV_ACCESS_TOKEN_SECRET),
            zone: string(ENV_ZONE),
            zones: string(ENV_ZONES).map(|v| split_list(&v)),
            default_zone: string(ENV_DEFAULT_ZONE),
            api_root_url: string(ENV_API_ROOT_URL),
            retry_max,
            retry_wait_max,
            retry_wait_min,
            api_request_timeout,
            api_request_rate_limit,
            trace: string(ENV_TRACE),
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
