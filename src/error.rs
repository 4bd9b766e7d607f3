//! # Provider Errors
//!
//! Failures inside a resource or data source operation. Every variant is
//! turned into a user-visible [`Diagnostic`] at the plugin boundary.

use thiserror::Error;

use crate::client::ApiError;
use crate::lookup::LookupError;
use crate::plugin::Diagnostic;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// State or configuration did not match the schema shape
    #[error("failed to decode attributes: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{attribute}: {message}")]
    InvalidAttribute { attribute: String, message: String },

    #[error("{0}")]
    Unsupported(String),
}

impl ProviderError {
    pub fn invalid_attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::InvalidAttribute {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Api(e) if e.is_not_found())
    }

    pub fn to_diagnostic(&self, summary: &str) -> Diagnostic {
        let diagnostic = Diagnostic::error(summary, self.to_string());
        match self {
            ProviderError::InvalidAttribute { attribute, .. } => {
                diagnostic.with_attribute(attribute.clone())
            }
            _ => diagnostic,
        }
    }
}
