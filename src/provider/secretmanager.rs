//! # `sakura_secretmanager`
//!
//! Secret Manager vaults. A vault is bound to the KMS key that encrypts its
//! secrets; the binding cannot change after creation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::models::{decode, encode, ensure_unchanged, null_as_default, require_id};
use crate::client::types::{Vault, VaultRequest};
use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::lookup::filter_vault_by_name;
use crate::plugin::schema::is_resource_id;
use crate::plugin::{Attribute, AttributeType, DataSource, Resource, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kms_key_id: String,
}

impl From<Vault> for VaultModel {
    fn from(vault: Vault) -> Self {
        Self {
            id: vault.id,
            name: vault.name,
            description: vault.description,
            tags: vault.tags,
            kms_key_id: vault.kms_key_id,
        }
    }
}

impl VaultModel {
    fn request(&self) -> VaultRequest {
        VaultRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            kms_key_id: self.kms_key_id.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct VaultResource;

#[async_trait]
impl Resource<ApiClient> for VaultResource {
    fn type_suffix(&self) -> &'static str {
        "secretmanager"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages a Secret Manager vault")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute(
                "name",
                Attribute::required_string().validator(Validator::NotEmpty),
            )
            .with_attribute("description", Attribute::optional_string())
            .with_attribute("tags", Attribute::optional(AttributeType::ListOfString))
            .with_attribute(
                "kms_key_id",
                Attribute::required_string()
                    .requires_replace()
                    .validator(Validator::ResourceId)
                    .description("ID of the KMS key encrypting the vault's secrets"),
            )
    }

    async fn create(&self, client: &ApiClient, planned_state: Value) -> Result<Value, ProviderError> {
        let plan: VaultModel = decode(planned_state)?;
        let created = client.secret_manager.create_vault(&plan.request()).await?;
        info!(id = %created.id, name = %created.name, kms_key_id = %created.kms_key_id, "created vault");

        let vault = client.secret_manager.read_vault(&created.id).await?;
        encode(&VaultModel::from(vault))
    }

    async fn read(
        &self,
        client: &ApiClient,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        let state: VaultModel = decode(current_state)?;
        let id = require_id("id", &state.id)?;
        match client.secret_manager.read_vault(id).await {
            Ok(vault) => Ok(Some(encode(&VaultModel::from(vault))?)),
            Err(e) if e.is_not_found() => {
                debug!(id, "vault not found");
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
        let prior: VaultModel = decode(prior_state)?;
        let plan: VaultModel = decode(planned_state)?;
        let id = require_id("id", &prior.id)?;
        ensure_unchanged("kms_key_id", &prior.kms_key_id, &plan.kms_key_id)?;

        let vault = client
            .secret_manager
            .update_vault(id, &plan.request())
            .await?;
        info!(id, "updated vault");
        encode(&VaultModel::from(vault))
    }

    async fn delete(&self, client: &ApiClient, current_state: Value) -> Result<(), ProviderError> {
        let state: VaultModel = decode(current_state)?;
        let id = require_id("id", &state.id)?;
        match client.secret_manager.delete_vault(id).await {
            Ok(()) => {
                info!(id, "deleted vault");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn import(&self, client: &ApiClient, id: &str) -> Result<Option<Value>, ProviderError> {
        if !is_resource_id(id) {
            return Err(ProviderError::invalid_attribute(
                "id",
                format!("{id:?} is not a valid vault ID"),
            ));
        }
        self.read(client, serde_json::json!({ "id": id })).await
    }
}

#[derive(Debug, Default, Deserialize)]
struct VaultLookup {
    #[serde(default, deserialize_with = "null_as_default")]
    resource_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Serialize)]
struct VaultDataModel {
    resource_id: String,
    #[serde(flatten)]
    vault: VaultModel,
}

#[derive(Debug, Default)]
pub struct VaultDataSource;

#[async_trait]
impl DataSource<ApiClient> for VaultDataSource {
    fn type_suffix(&self) -> &'static str {
        "secretmanager"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a Secret Manager vault by ID or name")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute(
                "resource_id",
                Attribute::optional_string()
                    .and_computed()
                    .validator(Validator::ResourceId),
            )
            .with_attribute(
                "name",
                Attribute::optional_string()
                    .and_computed()
                    .validator(Validator::NotEmpty),
            )
            .with_attribute("description", Attribute::computed_string())
            .with_attribute("tags", Attribute::computed(AttributeType::ListOfString))
            .with_attribute("kms_key_id", Attribute::computed_string())
            .with_exactly_one_of(&["resource_id", "name"])
    }

    async fn read(&self, client: &ApiClient, config: Value) -> Result<Value, ProviderError> {
        let lookup: VaultLookup = decode(config)?;
        let vault = if lookup.resource_id.is_empty() {
            let vaults = client.secret_manager.list_vaults().await?;
            filter_vault_by_name(&vaults, &lookup.name)?.clone()
        } else {
            client.secret_manager.read_vault(&lookup.resource_id).await?
        };

        encode(&VaultDataModel {
            resource_id: vault.id.clone(),
            vault: vault.into(),
        })
    }
}
