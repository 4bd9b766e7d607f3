//! # Sakura Provider
//!
//! The `sakura` provider: configuration schema, client construction and the
//! registry of resources and data sources.
//!
//! - `kms`: `sakura_kms`
//! - `secretmanager`: `sakura_secretmanager` (vaults)
//! - `secretmanager_secret`: `sakura_secretmanager_secret`

mod kms;
mod models;
mod secretmanager;
mod secretmanager_secret;

#[cfg(test)]
pub(crate) mod fakes;

pub use kms::{KmsDataSource, KmsModel, KmsResource};
pub use secretmanager::{VaultDataSource, VaultModel, VaultResource};
pub use secretmanager_secret::{SecretDataSource, SecretModel, SecretResource};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::client::ApiClient;
use crate::config::{ConfigError, EnvSettings, ProviderConfig};
use crate::constants::PROVIDER_TYPE_NAME;
use crate::plugin::{
    Attribute, AttributeType, DataSource, Diagnostic, Diagnostics, ProviderService, Resource,
    Schema,
};

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The provider, parameterised over where environment variables come from
#[derive(Clone)]
pub struct SakuraProvider {
    version: String,
    env: EnvLookup,
}

impl std::fmt::Debug for SakuraProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SakuraProvider")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl SakuraProvider {
    /// Provider reading the process environment
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Provider reading a fixed set of variables instead of the process environment
    pub fn with_env(version: impl Into<String>, vars: HashMap<String, String>) -> Self {
        Self {
            version: version.into(),
            env: Arc::new(move |key| vars.get(key).cloned()),
        }
    }
}

fn config_diagnostics(errors: Vec<ConfigError>) -> Diagnostics {
    errors.iter().map(ConfigError::to_diagnostic).collect()
}

#[async_trait]
impl ProviderService for SakuraProvider {
    type Client = ApiClient;

    fn type_name(&self) -> &'static str {
        PROVIDER_TYPE_NAME
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn schema(&self) -> Schema {
        let int = || Attribute::optional(AttributeType::Int64);
        Schema::new("Sakura Cloud KMS and Secret Manager")
            .with_attribute(
                "profile",
                Attribute::optional_string().description("usacloud profile name"),
            )
            .with_attribute(
                "token",
                Attribute::optional_string()
                    .sensitive()
                    .description("API access token"),
            )
            .with_attribute(
                "secret",
                Attribute::optional_string()
                    .sensitive()
                    .description("API access token secret"),
            )
            .with_attribute("zone", Attribute::optional_string())
            .with_attribute("zones", Attribute::optional(AttributeType::ListOfString))
            .with_attribute("default_zone", Attribute::optional_string())
            .with_attribute("api_root_url", Attribute::optional_string())
            .with_attribute("retry_max", int())
            .with_attribute("retry_wait_max", int().description("Seconds"))
            .with_attribute("retry_wait_min", int().description("Seconds"))
            .with_attribute("api_request_timeout", int().description("Seconds"))
            .with_attribute(
                "api_request_rate_limit",
                int().description("Maximum requests per second"),
            )
            .with_attribute(
                "trace",
                Attribute::optional_string().description("`api`, `http` or `all`"),
            )
    }

    async fn configure(
        &self,
        config: &Value,
        terraform_version: Option<&str>,
    ) -> Result<ApiClient, Diagnostics> {
        let env = EnvSettings::from_lookup(|key| (self.env)(key)).map_err(config_diagnostics)?;
        let resolved =
            ProviderConfig::load(config, env, terraform_version).map_err(config_diagnostics)?;

        let client = ApiClient::new(&resolved).map_err(|e| {
            Diagnostics::from(Diagnostic::error(
                "Unable to create API client",
                e.to_string(),
            ))
        })?;
        info!(
            profile = %resolved.profile,
            zone = %resolved.zone,
            version = %self.version,
            "provider configured"
        );
        Ok(client)
    }

    fn resources(&self) -> Vec<Box<dyn Resource<ApiClient>>> {
        vec![
            Box::new(KmsResource),
            Box::new(VaultResource),
            Box::new(SecretResource),
        ]
    }

    fn data_sources(&self) -> Vec<Box<dyn DataSource<ApiClient>>> {
        vec![
            Box::new(KmsDataSource),
            Box::new(VaultDataSource),
            Box::new(SecretDataSource),
        ]
    }
}
