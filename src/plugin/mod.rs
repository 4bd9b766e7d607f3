//! # Plugin Surface
//!
//! The engine-facing side of the provider: schema types, diagnostics, the
//! request/response envelope, and the traits resources and data sources implement.
//!
//! - `diagnostics`: errors and warnings returned to the engine
//! - `schema`: attribute schemas and configuration validation
//! - `protocol`: JSON request/response envelope
//! - `server`: dispatch of a request to the right resource or data source

pub mod diagnostics;
pub mod protocol;
pub mod schema;
pub mod server;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use protocol::{Request, Response};
pub use schema::{Attribute, AttributeType, ProviderSchema, Schema, Validator};
pub use server::{handle, serve};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;

/// A managed remote object
///
/// States are attribute objects as JSON. Implementations deserialize them into
/// their own typed models.
#[async_trait]
pub trait Resource<C: Send + Sync>: Send + Sync {
    /// Type name without the provider prefix, e.g. `kms`
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, client: &C, planned_state: Value) -> Result<Value, ProviderError>;

    /// Returns `None` when the remote object no longer exists
    async fn read(&self, client: &C, current_state: Value) -> Result<Option<Value>, ProviderError>;

    async fn update(
        &self,
        client: &C,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    async fn delete(&self, client: &C, current_state: Value) -> Result<(), ProviderError>;

    /// Import an existing object by identifier
    async fn import(&self, client: &C, id: &str) -> Result<Option<Value>, ProviderError> {
        self.read(client, serde_json::json!({ "id": id })).await
    }
}

/// A read-only query against existing remote objects
#[async_trait]
pub trait DataSource<C: Send + Sync>: Send + Sync {
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, client: &C, config: Value) -> Result<Value, ProviderError>;
}

/// A provider: configuration plus the resources and data sources it serves
#[async_trait]
pub trait ProviderService: Send + Sync {
    /// API client handed to resources once configured
    type Client: Send + Sync;

    /// Provider type name, the prefix of every resource type
    fn type_name(&self) -> &'static str;

    fn version(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Build the API client from the provider block
    async fn configure(
        &self,
        config: &Value,
        terraform_version: Option<&str>,
    ) -> Result<Self::Client, Diagnostics>;

    fn resources(&self) -> Vec<Box<dyn Resource<Self::Client>>>;

    fn data_sources(&self) -> Vec<Box<dyn DataSource<Self::Client>>>;
}
