//! # Request / Response Envelope
//!
//! One JSON request is read per invocation and one JSON response is written back.
//! Requests are tagged by `operation`:
//!
//! ```json
//! {
//!   "operation": "read_data_source",
//!   "type_name": "sakura_kms",
//!   "provider_config": {"zone": "is1b"},
//!   "config": {"name": "my-key"}
//! }
//! ```
//!
//! Every operation that talks to the API carries `provider_config`, since the
//! process keeps no state between invocations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::schema::ProviderSchema;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    GetSchema,
    ValidateProviderConfig {
        #[serde(default)]
        config: Value,
    },
    ValidateResourceConfig {
        type_name: String,
        #[serde(default)]
        config: Value,
    },
    ValidateDataSourceConfig {
        type_name: String,
        #[serde(default)]
        config: Value,
    },
    Create {
        type_name: String,
        #[serde(default)]
        provider_config: Value,
        #[serde(default)]
        terraform_version: Option<String>,
        planned_state: Value,
    },
    Read {
        type_name: String,
        #[serde(default)]
        provider_config: Value,
        #[serde(default)]
        terraform_version: Option<String>,
        current_state: Value,
    },
    Update {
        type_name: String,
        #[serde(default)]
        provider_config: Value,
        #[serde(default)]
        terraform_version: Option<String>,
        prior_state: Value,
        planned_state: Value,
    },
    Delete {
        type_name: String,
        #[serde(default)]
        provider_config: Value,
        #[serde(default)]
        terraform_version: Option<String>,
        current_state: Value,
    },
    Import {
        type_name: String,
        #[serde(default)]
        provider_config: Value,
        #[serde(default)]
        terraform_version: Option<String>,
        id: String,
    },
    ReadDataSource {
        type_name: String,
        #[serde(default)]
        provider_config: Value,
        #[serde(default)]
        terraform_version: Option<String>,
        #[serde(default)]
        config: Value,
    },
}

impl Request {
    /// Operation name as it appears on the wire, for logging
    pub fn operation(&self) -> &'static str {
        match self {
            Request::GetSchema => "get_schema",
            Request::ValidateProviderConfig { .. } => "validate_provider_config",
            Request::ValidateResourceConfig { .. } => "validate_resource_config",
            Request::ValidateDataSourceConfig { .. } => "validate_data_source_config",
            Request::Create { .. } => "create",
            Request::Read { .. } => "read",
            Request::Update { .. } => "update",
            Request::Delete { .. } => "delete",
            Request::Import { .. } => "import",
            Request::ReadDataSource { .. } => "read_data_source",
        }
    }
}

/// Response written back to the engine
///
/// `state` is `null` when the operation produces no state: validation, delete, or a
/// read that found the remote object gone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ProviderSchema>,
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl Response {
    pub fn state(state: Value) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    pub fn removed() -> Self {
        Self::default()
    }

    pub fn schema(schema: ProviderSchema) -> Self {
        Self {
            schema: Some(schema),
            ..Self::default()
        }
    }

    pub fn diagnostics(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }

    pub fn error(diagnostic: Diagnostic) -> Self {
        Self::diagnostics(diagnostic.into())
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}
