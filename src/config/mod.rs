//! # Configuration
//!
//! Provider configuration assembled from four layers, highest precedence first:
//!
//! 1. Attributes set explicitly in the provider block
//! 2. `SAKURACLOUD_*` environment variables ([`EnvSettings`])
//! 3. The selected usacloud profile ([`Profile`])
//! 4. Built-in defaults
//!
//! Empty strings and nulls at any layer count as "not set".

mod env;
mod error;
mod profile;

pub use env::EnvSettings;
pub use error::ConfigError;
pub use profile::Profile;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use crate::client::TraceMode;
use crate::constants::{
    DEFAULT_API_REQUEST_RATE_LIMIT, DEFAULT_API_REQUEST_TIMEOUT_SECS, DEFAULT_API_ROOT_URL,
    DEFAULT_PROFILE_NAME, DEFAULT_RETRY_MAX, DEFAULT_ZONE, DEFAULT_ZONES, ENV_ACCESS_TOKEN,
    ENV_ACCESS_TOKEN_SECRET,
};

/// Attributes of the provider block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplicitConfig {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub zones: Option<Vec<String>>,
    #[serde(default)]
    pub default_zone: Option<String>,
    #[serde(default)]
    pub api_root_url: Option<String>,
    #[serde(default)]
    pub retry_max: Option<i64>,
    #[serde(default)]
    pub retry_wait_max: Option<i64>,
    #[serde(default)]
    pub retry_wait_min: Option<i64>,
    #[serde(default)]
    pub api_request_timeout: Option<i64>,
    #[serde(default)]
    pub api_request_rate_limit: Option<i64>,
    #[serde(default)]
    pub trace: Option<String>,
}

impl ExplicitConfig {
    /// Decode the provider block; `null` means nothing was set
    pub fn from_value(config: &Value) -> Result<Self, ConfigError> {
        if config.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(config.clone()).map_err(|e| ConfigError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

/// Fully resolved provider configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub profile: String,
    pub access_token: String,
    pub access_token_secret: Zeroizing<String>,
    pub zone: String,
    pub zones: Vec<String>,
    pub default_zone: String,
    pub api_root_url: String,
    pub retry_max: i64,
    /// Seconds; zero selects the client default
    pub retry_wait_max: i64,
    /// Seconds; zero selects the client default
    pub retry_wait_min: i64,
    /// Seconds
    pub api_request_timeout: i64,
    /// Requests per second
    pub api_request_rate_limit: i64,
    pub trace_mode: TraceMode,
    pub terraform_version: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("profile", &self.profile)
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .field("zone", &self.zone)
            .field("zones", &self.zones)
            .field("default_zone", &self.default_zone)
            .field("api_root_url", &self.api_root_url)
            .field("retry_max", &self.retry_max)
            .field("retry_wait_max", &self.retry_wait_max)
            .field("retry_wait_min", &self.retry_wait_min)
            .field("api_request_timeout", &self.api_request_timeout)
            .field("api_request_rate_limit", &self.api_request_rate_limit)
            .field("trace_mode", &self.trace_mode)
            .field("terraform_version", &self.terraform_version)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ProviderConfig {
    /// Merge the configuration layers
    ///
    /// Only the trace mode can fail here; range and consistency checks live in
    /// [`ProviderConfig::validate`].
    pub fn resolve(
        explicit: ExplicitConfig,
        env: EnvSettings,
        profile: Profile,
    ) -> Result<Self, ConfigError> {
        let trace = non_empty(explicit.trace)
            .or(env.trace)
            .or(non_empty(profile.trace_mode))
            .unwrap_or_default();
        let trace_mode = trace
            .parse::<TraceMode>()
            .map_err(|e| ConfigError::Invalid {
                attribute: "trace".to_string(),
                message: e.to_string(),
            })?;

        let zones = explicit
            .zones
            .filter(|z| !z.is_empty())
            .or(env.zones)
            .or(profile.zones.filter(|z| !z.is_empty()))
            .unwrap_or_else(|| DEFAULT_ZONES.iter().map(|z| (*z).to_string()).collect());

        Ok(Self {
            profile: non_empty(explicit.profile)
                .or(env.profile)
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            access_token: non_empty(explicit.token)
                .or(env.access_token)
                .or(non_empty(profile.access_token))
                .unwrap_or_default(),
            access_token_secret: Zeroizing::new(
                non_empty(explicit.secret)
                    .or(env.access_token_secret)
                    .or(non_empty(profile.access_token_secret))
                    .unwrap_or_default(),
            ),
            zone: non_empty(explicit.zone)
                .or(env.zone)
                .or(non_empty(profile.zone))
                .unwrap_or_else(|| DEFAULT_ZONE.to_string()),
            zones,
            default_zone: non_empty(explicit.default_zone)
                .or(env.default_zone)
                .or(non_empty(profile.default_zone))
                .unwrap_or_default(),
            api_root_url: non_empty(explicit.api_root_url)
                .or(env.api_root_url)
                .or(non_empty(profile.api_root_url))
                .unwrap_or_else(|| DEFAULT_API_ROOT_URL.to_string()),
            retry_max: explicit
                .retry_max
                .or(env.retry_max)
                .or(profile.retry_max)
                .unwrap_or(DEFAULT_RETRY_MAX),
            retry_wait_max: explicit
                .retry_wait_max
                .or(env.retry_wait_max)
                .or(profile.retry_wait_max)
                .unwrap_or(0),
            retry_wait_min: explicit
                .retry_wait_min
                .or(env.retry_wait_min)
                .or(profile.retry_wait_min)
                .unwrap_or(0),
            api_request_timeout: explicit
                .api_request_timeout
                .or(env.api_request_timeout)
                .or(profile.http_request_timeout)
                .unwrap_or(DEFAULT_API_REQUEST_TIMEOUT_SECS),
            api_request_rate_limit: explicit
                .api_request_rate_limit
                .or(env.api_request_rate_limit)
                .or(profile.http_request_rate_limit)
                .unwrap_or(DEFAULT_API_REQUEST_RATE_LIMIT),
            trace_mode,
            terraform_version: None,
        })
    }

    /// Resolve and validate the configuration for one provider invocation
    ///
    /// The profile is chosen by the explicit `profile` attribute, then
    /// `SAKURACLOUD_PROFILE`, then `default`.
    pub fn load(
        config: &Value,
        env: EnvSettings,
        terraform_version: Option<&str>,
    ) -> Result<Self, Vec<ConfigError>> {
        let explicit = ExplicitConfig::from_value(config).map_err(|e| vec![e])?;
        let profile_name = non_empty(explicit.profile.clone())
            .or_else(|| env.profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
        let profile =
            Profile::load(&profile_name, env.profile_dir.as_deref()).map_err(|e| vec![e])?;

        let mut resolved = Self::resolve(explicit, env, profile).map_err(|e| vec![e])?;
        resolved.terraform_version = terraform_version.map(String::from);
        resolved.validate()?;

        debug!(
            profile = %resolved.profile,
            zone = %resolved.zone,
            api_root_url = %resolved.api_root_url,
            trace = %resolved.trace_mode,
            "resolved provider configuration"
        );
        Ok(resolved)
    }

    /// Range and consistency checks; every violation is reported
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        let mut invalid = |attribute: &str, message: String| {
            errors.push(ConfigError::Invalid {
                attribute: attribute.to_string(),
                message,
            });
        };

        if self.retry_max < 0 {
            invalid("retry_max", "retry_max must not be negative".to_string());
        }
        if self.retry_wait_min < 0 {
            invalid("retry_wait_min", "retry_wait_min must not be negative".to_string());
        }
        if self.retry_wait_max < 0 {
            invalid("retry_wait_max", "retry_wait_max must not be negative".to_string());
        }
        if self.retry_wait_min > 0
            && self.retry_wait_max > 0
            && self.retry_wait_min > self.retry_wait_max
        {
            invalid(
                "retry_wait_min",
                format!(
                    "retry_wait_min ({}) must not exceed retry_wait_max ({})",
                    self.retry_wait_min, self.retry_wait_max
                ),
            );
        }
        if self.api_request_timeout <= 0 {
            invalid(
                "api_request_timeout",
                "api_request_timeout must be positive".to_string(),
            );
        }
        if self.api_request_rate_limit <= 0 {
            invalid(
                "api_request_rate_limit",
                "api_request_rate_limit must be positive".to_string(),
            );
        }
        if let Err(e) = reqwest::Url::parse(&self.api_root_url) {
            invalid(
                "api_root_url",
                format!("api_root_url {:?} is not a valid URL: {e}", self.api_root_url),
            );
        }

        if self.access_token.is_empty() || self.access_token_secret.is_empty() {
            errors.push(ConfigError::MissingCredentials {
                env_token: ENV_ACCESS_TOKEN,
                env_secret: ENV_ACCESS_TOKEN_SECRET,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn credentials_env() -> EnvSettings {
        EnvSettings {
            access_token: Some("env-token".to_string()),
            access_token_secret: Some("env-secret".to_string()),
            ..EnvSettings::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config =
            ProviderConfig::resolve(ExplicitConfig::default(), credentials_env(), Profile::default())
                .unwrap();
        assert_eq!(config.profile, "default");
        assert_eq!(config.zone, "is1b");
        assert_eq!(config.zones, vec!["is1a", "is1b", "tk1a", "tk1b", "tk1v"]);
        assert_eq!(config.api_root_url, DEFAULT_API_ROOT_URL);
        assert_eq!(config.retry_max, 100);
        assert_eq!(config.retry_wait_min, 0);
        assert_eq!(config.retry_wait_max, 0);
        assert_eq!(config.api_request_timeout, 300);
        assert_eq!(config.api_request_rate_limit, 10);
        assert_eq!(config.trace_mode, TraceMode::Off);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_overrides_env_and_profile() {
        let explicit = ExplicitConfig {
            zone: Some("tk1a".to_string()),
            retry_max: Some(3),
            token: Some("explicit-token".to_string()),
            ..ExplicitConfig::default()
        };
        let env = EnvSettings {
            zone: Some("is1a".to_string()),
            retry_max: Some(7),
            api_request_timeout: Some(60),
            ..credentials_env()
        };
        let profile = Profile {
            zone: Some("tk1b".to_string()),
            http_request_timeout: Some(10),
            http_request_rate_limit: Some(2),
            ..Profile::default()
        };

        let config = ProviderConfig::resolve(explicit, env, profile).unwrap();
        assert_eq!(config.zone, "tk1a");
        assert_eq!(config.retry_max, 3);
        assert_eq!(config.access_token, "explicit-token");
        assert_eq!(config.access_token_secret.as_str(), "env-secret");
        assert_eq!(config.api_request_timeout, 60);
        assert_eq!(config.api_request_rate_limit, 2);
    }

    #[test]
    fn test_explicit_empty_string_counts_as_unset() {
        let explicit = ExplicitConfig {
            zone: Some(String::new()),
            ..ExplicitConfig::default()
        };
        let env = EnvSettings {
            zone: Some("tk1v".to_string()),
            ..credentials_env()
        };
        let config = ProviderConfig::resolve(explicit, env, Profile::default()).unwrap();
        assert_eq!(config.zone, "tk1v");
    }

    #[test]
    fn test_invalid_trace_mode() {
        let explicit = ExplicitConfig {
            trace: Some("verbose".to_string()),
            ..ExplicitConfig::default()
        };
        let err = ProviderConfig::resolve(explicit, credentials_env(), Profile::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref attribute, .. } if attribute == "trace"));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let explicit = ExplicitConfig {
            retry_wait_min: Some(10),
            retry_wait_max: Some(5),
            api_request_rate_limit: Some(0),
            ..ExplicitConfig::default()
        };
        let config =
            ProviderConfig::resolve(explicit, EnvSettings::default(), Profile::default()).unwrap();
        let errors = config.validate().unwrap_err();

        let attributes: Vec<&str> = errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::Invalid { attribute, .. } => Some(attribute.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            attributes,
            vec!["retry_wait_min", "api_request_rate_limit"]
        );
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingCredentials { .. })));
    }

    #[test]
    fn test_zone_outside_zone_list_is_accepted() {
        let explicit = ExplicitConfig::from_value(&json!({"zones": ["tk1a"]})).unwrap();
        let config =
            ProviderConfig::resolve(explicit, credentials_env(), Profile::default()).unwrap();
        assert_eq!(config.zone, "is1b");
        assert_eq!(config.zones, vec!["tk1a"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_config_rejects_unknown_attribute() {
        let err = ExplicitConfig::from_value(&json!({"region": "eu"})).unwrap_err();
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn test_load_uses_profile_dir_and_terraform_version() {
        let dir = tempfile::tempdir().unwrap();
        let profile_dir = dir.path().join("work");
        std::fs::create_dir_all(&profile_dir).unwrap();
        std::fs::write(
            profile_dir.join("config.json"),
            r#"{"AccessToken":"p-token","AccessTokenSecret":"p-secret","Zone":"tk1b"}"#,
        )
        .unwrap();

        let env = EnvSettings {
            profile_dir: Some(dir.path().to_path_buf()),
            ..EnvSettings::default()
        };
        let config =
            ProviderConfig::load(&json!({"profile": "work"}), env, Some("1.9.0")).unwrap();
        assert_eq!(config.profile, "work");
        assert_eq!(config.access_token, "p-token");
        assert_eq!(config.zone, "tk1b");
        assert_eq!(config.terraform_version.as_deref(), Some("1.9.0"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config =
            ProviderConfig::resolve(ExplicitConfig::default(), credentials_env(), Profile::default())
                .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("env-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
