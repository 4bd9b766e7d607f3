//! # Configuration Errors

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::plugin::Diagnostic;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {var} has non-integer value {value:?}: {source}")]
    InvalidEnvValue {
        var: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("profile {name:?} not found at {}", path.display())]
    ProfileNotFound { name: String, path: PathBuf },

    #[error("failed to read profile {}: {source}", path.display())]
    ProfileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile {}: {source}", path.display())]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid provider configuration: {message}")]
    InvalidConfig { message: String },

    /// An explicit provider attribute had the wrong shape
    #[error("{attribute}: {message}")]
    Invalid { attribute: String, message: String },

    #[error("missing API credentials: set token and secret in the provider block, the {env_token} / {env_secret} environment variables, or a usacloud profile")]
    MissingCredentials {
        env_token: &'static str,
        env_secret: &'static str,
    },
}

impl ConfigError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::InvalidEnvValue { var, .. } => Diagnostic::error(
                format!("Error parsing environment variable \"{var}\""),
                self.to_string(),
            ),
            ConfigError::Invalid { attribute, message } => {
                Diagnostic::error("Invalid provider attribute", message.clone())
                    .with_attribute(attribute.clone())
            }
            ConfigError::ProfileNotFound { .. }
            | ConfigError::ProfileRead { .. }
            | ConfigError::ProfileParse { .. } => {
                Diagnostic::error("Error loading usacloud profile", self.to_string())
            }
            ConfigError::InvalidConfig { .. } | ConfigError::MissingCredentials { .. } => {
                Diagnostic::error("Invalid provider configuration", self.to_string())
            }
        }
    }
}
