//! # `sakura_kms`
//!
//! KMS keys as a resource and a data source.
//!
//! Imported keys carry their key material in `plain_key`, which the API never
//! returns. Reads keep it from prior state.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::models::{decode, encode, ensure_unchanged, null_as_default, require_id};
use crate::client::types::{CreateKeyRequest, Key, KeyOrigin, UpdateKeyRequest};
use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::lookup::filter_kms_by_name;
use crate::plugin::schema::is_resource_id;
use crate::plugin::{Attribute, AttributeType, DataSource, Resource, Schema, Validator};

const PLAIN_KEY_LEN: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmsModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub key_origin: Option<String>,
    #[serde(default)]
    pub plain_key: Option<String>,
}

impl KmsModel {
    fn from_key(key: Key, plain_key: Option<String>) -> Self {
        Self {
            id: key.id,
            name: key.name,
            description: key.description,
            tags: key.tags,
            key_origin: Some(key.key_origin.to_string()),
            plain_key,
        }
    }

    fn origin(&self) -> Result<KeyOrigin, ProviderError> {
        match self.key_origin.as_deref() {
            None | Some("") => Ok(KeyOrigin::default()),
            Some(value) => value
                .parse()
                .map_err(|message: String| ProviderError::invalid_attribute("key_origin", message)),
        }
    }

    fn create_request(&self) -> Result<CreateKeyRequest, ProviderError> {
        let key_origin = self.origin()?;
        let plain_key = self.plain_key.clone().filter(|k| !k.is_empty());
        match (key_origin, &plain_key) {
            (KeyOrigin::Imported, None) => {
                return Err(ProviderError::invalid_attribute(
                    "plain_key",
                    "plain_key is required when key_origin is \"imported\"",
                ));
            }
            (KeyOrigin::Imported, Some(encoded)) => validate_plain_key(encoded)?,
            (KeyOrigin::Generated, Some(_)) => {
                return Err(ProviderError::invalid_attribute(
                    "plain_key",
                    "plain_key can only be set when key_origin is \"imported\"",
                ));
            }
            (KeyOrigin::Generated, None) => {}
        }

        Ok(CreateKeyRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            key_origin,
            plain_key,
        })
    }
}

fn validate_plain_key(encoded: &str) -> Result<(), ProviderError> {
    let decoded = STANDARD.decode(encoded).map_err(|e| {
        ProviderError::invalid_attribute("plain_key", format!("plain_key is not valid base64: {e}"))
    })?;
    if decoded.len() != PLAIN_KEY_LEN {
        return Err(ProviderError::invalid_attribute(
            "plain_key",
            format!(
                "plain_key must decode to {PLAIN_KEY_LEN} bytes, got {}",
                decoded.len()
            ),
        ));
    }
    Ok(())
}

fn key_origin_attribute() -> Attribute {
    Attribute::optional_string()
        .and_computed()
        .requires_replace()
        .validator(Validator::OneOf(vec![
            KeyOrigin::Generated.to_string(),
            KeyOrigin::Imported.to_string(),
        ]))
        .description("Origin of the key material: `generated` (default) or `imported`")
}

#[derive(Debug, Default)]
pub struct KmsResource;

#[async_trait]
impl Resource<ApiClient> for KmsResource {
    fn type_suffix(&self) -> &'static str {
        "kms"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages a KMS key")
            .with_attribute("id", Attribute::computed_string().description("Key ID"))
            .with_attribute(
                "name",
                Attribute::required_string()
                    .validator(Validator::NotEmpty)
                    .description("Name of the key"),
            )
            .with_attribute("description", Attribute::optional_string())
            .with_attribute("tags", Attribute::optional(AttributeType::ListOfString))
            .with_attribute("key_origin", key_origin_attribute())
            .with_attribute(
                "plain_key",
                Attribute::optional_string()
                    .sensitive()
                    .requires_replace()
                    .description("Base64 encoded 32 byte key material, required for imported keys"),
            )
    }

    async fn create(&self, client: &ApiClient, planned_state: Value) -> Result<Value, ProviderError> {
        let plan: KmsModel = decode(planned_state)?;
        let request = plan.create_request()?;
        let created = client.kms.create_key(&request).await?;
        info!(id = %created.id, name = %created.name, key_origin = %created.key_origin, "created KMS key");

        let key = client.kms.read_key(&created.id).await?;
        encode(&KmsModel::from_key(key, plan.plain_key))
    }

    async fn read(
        &self,
        client: &ApiClient,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        let state: KmsModel = decode(current_state)?;
        let id = require_id("id", &state.id)?;
        match client.kms.read_key(id).await {
            Ok(key) => Ok(Some(encode(&KmsModel::from_key(key, state.plain_key))?)),
            Err(e) if e.is_not_found() => {
                debug!(id, "KMS key not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        client: &ApiClient,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let prior: KmsModel = decode(prior_state)?;
        let plan: KmsModel = decode(planned_state)?;
        let id = require_id("id", &prior.id)?;
        ensure_unchanged("key_origin", &prior.origin()?, &plan.origin()?)?;
        ensure_unchanged("plain_key", &prior.plain_key, &plan.plain_key)?;

        let request = UpdateKeyRequest {
            name: plan.name.clone(),
            description: plan.description.clone(),
            tags: plan.tags.clone(),
        };
        let key = client.kms.update_key(id, &request).await?;
        info!(id, "updated KMS key");
        encode(&KmsModel::from_key(key, plan.plain_key))
    }

    async fn delete(&self, client: &ApiClient, current_state: Value) -> Result<(), ProviderError> {
        let state: KmsModel = decode(current_state)?;
        let id = require_id("id", &state.id)?;
        match client.kms.delete_key(id).await {
            Ok(()) => {
                info!(id, "deleted KMS key");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(id, "KMS key already deleted");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn import(&self, client: &ApiClient, id: &str) -> Result<Option<Value>, ProviderError> {
        if !is_resource_id(id) {
            return Err(ProviderError::invalid_attribute(
                "id",
                format!("{id:?} is not a valid KMS key ID"),
            ));
        }
        self.read(client, serde_json::json!({ "id": id })).await
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct KmsLookup {
    #[serde(default, deserialize_with = "null_as_default")]
    resource_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Serialize)]
struct KmsDataModel {
    id: String,
    resource_id: String,
    name: String,
    description: String,
    tags: Vec<String>,
    key_origin: String,
}

#[derive(Debug, Default)]
pub struct KmsDataSource;

#[async_trait]
impl DataSource<ApiClient> for KmsDataSource {
    fn type_suffix(&self) -> &'static str {
        "kms"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a KMS key by ID or name")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute(
                "resource_id",
                Attribute::optional_string()
                    .and_computed()
                    .validator(Validator::ResourceId)
                    .description("ID of the key to look up"),
            )
            .with_attribute(
                "name",
                Attribute::optional_string()
                    .and_computed()
                    .validator(Validator::NotEmpty)
                    .description("Name of the key to look up; must match exactly one key"),
            )
            .with_attribute("description", Attribute::computed_string())
            .with_attribute("tags", Attribute::computed(AttributeType::ListOfString))
            .with_attribute("key_origin", Attribute::computed_string())
            .with_exactly_one_of(&["resource_id", "name"])
    }

    async fn read(&self, client: &ApiClient, config: Value) -> Result<Value, ProviderError> {
        let lookup: KmsLookup = decode(config)?;
        let key = if lookup.resource_id.is_empty() {
            let keys = client.kms.list_keys().await?;
            filter_kms_by_name(&keys, &lookup.name)?.clone()
        } else {
            client.kms.read_key(&lookup.resource_id).await?
        };
        debug!(id = %key.id, name = %key.name, "found KMS key");

        encode(&KmsDataModel {
            id: key.id.clone(),
            resource_id: key.id,
            name: key.name,
            description: key.description,
            tags: key.tags,
            key_origin: key.key_origin.to_string(),
        })
    }
}
