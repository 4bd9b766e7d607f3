//! # `sakura_secretmanager_secret`
//!
//! Secrets stored in a vault, identified as `<vault_id>/<name>`. Every value
//! change stores a new version; the API never lists values, so reads keep the
//! value from prior state and only unveil it when state has none (import).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::models::{decode, encode, ensure_unchanged, null_as_default};
use crate::client::types::{DeleteSecretRequest, PutSecretRequest, UnveilSecretRequest};
use crate::client::ApiClient;
use crate::error::ProviderError;
use crate::lookup::{filter_secret_by_name, LookupError};
use crate::plugin::schema::is_resource_id;
use crate::plugin::{Attribute, AttributeType, DataSource, Resource, Schema, Validator};

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vault_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub value: Option<Zeroizing<String>>,
    #[serde(default)]
    pub version: Option<i64>,
}

impl std::fmt::Debug for SecretModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretModel")
            .field("id", &self.id)
            .field("vault_id", &self.vault_id)
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Split `<vault_id>/<name>`
fn parse_secret_id(id: &str) -> Result<(&str, &str), ProviderError> {
    match id.split_once('/') {
        Some((vault_id, name)) if is_resource_id(vault_id) && !name.is_empty() => {
            Ok((vault_id, name))
        }
        _ => Err(ProviderError::invalid_attribute(
            "id",
            format!("{id:?} is not a valid secret ID, expected \"<vault_id>/<name>\""),
        )),
    }
}

fn secret_id(vault_id: &str, name: &str) -> String {
    format!("{vault_id}/{name}")
}

impl SecretModel {
    /// Vault and name from the explicit attributes, falling back to `id`
    fn address(&self) -> Result<(String, String), ProviderError> {
        if !self.vault_id.is_empty() && !self.name.is_empty() {
            return Ok((self.vault_id.clone(), self.name.clone()));
        }
        let (vault_id, name) = parse_secret_id(&self.id)?;
        Ok((vault_id.to_string(), name.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct SecretResource;

impl SecretResource {
    async fn put(
        client: &ApiClient,
        vault_id: &str,
        name: &str,
        value: Option<Zeroizing<String>>,
    ) -> Result<SecretModel, ProviderError> {
        let value = value.ok_or_else(|| {
            ProviderError::invalid_attribute("value", "value must be set")
        })?;
        let request = PutSecretRequest {
            name: name.to_string(),
            value,
        };
        let secret = client.secret_manager.put_secret(vault_id, &request).await?;
        info!(vault_id, name, version = secret.latest_version, "stored secret version");

        Ok(SecretModel {
            id: secret_id(vault_id, name),
            vault_id: vault_id.to_string(),
            name: name.to_string(),
            value: Some(request.value),
            version: Some(secret.latest_version),
        })
    }
}

#[async_trait]
impl Resource<ApiClient> for SecretResource {
    fn type_suffix(&self) -> &'static str {
        "secretmanager_secret"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages a secret stored in a Secret Manager vault")
            .with_attribute(
                "id",
                Attribute::computed_string().description("`<vault_id>/<name>`"),
            )
            .with_attribute(
                "vault_id",
                Attribute::required_string()
                    .requires_replace()
                    .validator(Validator::ResourceId),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .requires_replace()
                    .validator(Validator::NotEmpty),
            )
            .with_attribute("value", Attribute::required_string().sensitive())
            .with_attribute(
                "version",
                Attribute::computed(AttributeType::Int64).description("Latest version number"),
            )
    }

    async fn create(&self, client: &ApiClient, planned_state: Value) -> Result<Value, ProviderError> {
        let plan: SecretModel = decode(planned_state)?;
        let (vault_id, name) = plan.address()?;
        let state = Self::put(client, &vault_id, &name, plan.value).await?;
        encode(&state)
    }

    async fn read(
        &self,
        client: &ApiClient,
        current_state: Value,
    ) -> Result<Option<Value>, ProviderError> {
        let state: SecretModel = decode(current_state)?;
        let (vault_id, name) = state.address()?;

        let secrets = match client.secret_manager.list_secrets(&vault_id).await {
            Ok(secrets) => secrets,
            Err(e) if e.is_not_found() => {
                debug!(vault_id = %vault_id, "vault not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let secret = match filter_secret_by_name(&secrets, &name) {
            Ok(secret) => secret,
            Err(LookupError::NotFound { .. }) => {
                debug!(vault_id = %vault_id, name = %name, "secret not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let value = match state.value {
            Some(value) => value,
            None => {
                let request = UnveilSecretRequest {
                    name: name.clone(),
                    version: None,
                };
                client
                    .secret_manager
                    .unveil_secret(&vault_id, &request)
                    .await?
                    .value
            }
        };

        Ok(Some(encode(&SecretModel {
            id: secret_id(&vault_id, &name),
            version: Some(secret.latest_version),
            vault_id,
            name,
            value: Some(value),
        })?))
    }

    async fn update(
        &self,
        client: &ApiClient,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let prior: SecretModel = decode(prior_state)?;
        let plan: SecretModel = decode(planned_state)?;
        let (vault_id, name) = prior.address()?;
        ensure_unchanged("vault_id", &vault_id, &plan.vault_id)?;
        ensure_unchanged("name", &name, &plan.name)?;

        if plan.value == prior.value {
            return encode(&SecretModel {
                id: secret_id(&vault_id, &name),
                vault_id,
                name,
                value: prior.value,
                version: prior.version,
            });
        }
        encode(&Self::put(client, &vault_id, &name, plan.value).await?)
    }

    async fn delete(&self, client: &ApiClient, current_state: Value) -> Result<(), ProviderError> {
        let state: SecretModel = decode(current_state)?;
        let (vault_id, name) = state.address()?;
        let request = DeleteSecretRequest { name: name.clone() };
        match client.secret_manager.delete_secret(&vault_id, &request).await {
            Ok(()) => {
                info!(vault_id = %vault_id, name = %name, "deleted secret");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn import(&self, client: &ApiClient, id: &str) -> Result<Option<Value>, ProviderError> {
        let (vault_id, name) = parse_secret_id(id)?;
        self.read(
            client,
            serde_json::json!({ "id": id, "vault_id": vault_id, "name": name }),
        )
        .await
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretLookup {
    #[serde(default, deserialize_with = "null_as_default")]
    vault_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default)]
    version: Option<i64>,
}

#[derive(Debug, Default)]
pub struct SecretDataSource;

#[async_trait]
impl DataSource<ApiClient> for SecretDataSource {
    fn type_suffix(&self) -> &'static str {
        "secretmanager_secret"
    }

    fn schema(&self) -> Schema {
        Schema::new("Reads a secret value from a Secret Manager vault")
            .with_attribute("id", Attribute::computed_string())
            .with_attribute(
                "vault_id",
                Attribute::required_string().validator(Validator::ResourceId),
            )
            .with_attribute(
                "name",
                Attribute::required_string().validator(Validator::NotEmpty),
            )
            .with_attribute(
                "version",
                Attribute::optional(AttributeType::Int64)
                    .and_computed()
                    .description("Version to read; the latest when unset"),
            )
            .with_attribute("value", Attribute::computed_string().sensitive())
    }

    async fn read(&self, client: &ApiClient, config: Value) -> Result<Value, ProviderError> {
        let lookup: SecretLookup = decode(config)?;
        if let Some(version) = lookup.version {
            if version < 1 {
                return Err(ProviderError::invalid_attribute(
                    "version",
                    format!("version must be at least 1, got {version}"),
                ));
            }
        }
        let request = UnveilSecretRequest {
            name: lookup.name.clone(),
            version: lookup.version,
        };
        let unveiled = client
            .secret_manager
            .unveil_secret(&lookup.vault_id, &request)
            .await?;

        encode(&SecretModel {
            id: secret_id(&lookup.vault_id, &lookup.name),
            vault_id: lookup.vault_id,
            name: lookup.name,
            value: Some(unveiled.value),
            version: Some(unveiled.version),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::types::VaultRequest;
    use crate::provider::fakes;

    async fn vault(client: &ApiClient) -> String {
        client
            .secret_manager
            .create_vault(&VaultRequest {
                name: "vault".to_string(),
                description: String::new(),
                tags: Vec::new(),
                kms_key_id: "110000000001".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_parse_secret_id() {
        assert_eq!(
            parse_secret_id("120000000001/db").unwrap(),
            ("120000000001", "db")
        );
        assert!(parse_secret_id("120000000001/").is_err());
        assert!(parse_secret_id("db").is_err());
        assert!(parse_secret_id("abc/db").is_err());
    }

    #[test]
    fn test_model_keeps_value_out_of_debug() {
        let model: SecretModel = decode(json!({
            "id": "120000000001/db",
            "vault_id": "120000000001",
            "name": "db",
            "value": "s3cr3t",
            "version": 1
        }))
        .unwrap();
        assert_eq!(model.value.as_deref().map(String::as_str), Some("s3cr3t"));
        assert!(!format!("{model:?}").contains("s3cr3t"));
        assert_eq!(encode(&model).unwrap()["value"], "s3cr3t");
    }

    #[tokio::test]
    async fn test_versions_advance_on_update() {
        let (client, _, _) = fakes::client();
        let vault_id = vault(&client).await;

        let state = SecretResource
            .create(
                &client,
                json!({"vault_id": vault_id, "name": "db", "value": "one"}),
            )
            .await
            .unwrap();
        assert_eq!(state["id"], format!("{vault_id}/db"));
        assert_eq!(state["version"], 1);

        let mut plan = state.clone();
        plan["value"] = json!("two");
        let updated = SecretResource.update(&client, state, plan).await.unwrap();
        assert_eq!(updated["version"], 2);

        let unchanged = SecretResource
            .update(&client, updated.clone(), updated.clone())
            .await
            .unwrap();
        assert_eq!(unchanged["version"], 2);

        let latest = SecretDataSource
            .read(&client, json!({"vault_id": vault_id, "name": "db"}))
            .await
            .unwrap();
        assert_eq!(latest["value"], "two");
        assert_eq!(latest["version"], 2);

        let first = SecretDataSource
            .read(&client, json!({"vault_id": vault_id, "name": "db", "version": 1}))
            .await
            .unwrap();
        assert_eq!(first["value"], "one");
    }

    #[tokio::test]
    async fn test_import_unveils_value() {
        let (client, _, _) = fakes::client();
        let vault_id = vault(&client).await;
        SecretResource
            .create(
                &client,
                json!({"vault_id": vault_id, "name": "token", "value": "s3cr3t"}),
            )
            .await
            .unwrap();

        let imported = SecretResource
            .import(&client, &format!("{vault_id}/token"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(imported["value"], "s3cr3t");
        assert_eq!(imported["vault_id"], json!(vault_id));
        assert_eq!(imported["version"], 1);
    }

    #[tokio::test]
    async fn test_read_missing_secret_removes_state() {
        let (client, _, _) = fakes::client();
        let vault_id = vault(&client).await;
        let state = SecretResource
            .create(
                &client,
                json!({"vault_id": vault_id, "name": "gone", "value": "v"}),
            )
            .await
            .unwrap();
        SecretResource.delete(&client, state.clone()).await.unwrap();
        assert_eq!(SecretResource.read(&client, state.clone()).await.unwrap(), None);
        SecretResource.delete(&client, state).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_requires_replace() {
        let (client, _, _) = fakes::client();
        let vault_id = vault(&client).await;
        let state = SecretResource
            .create(&client, json!({"vault_id": vault_id, "name": "a", "value": "v"}))
            .await
            .unwrap();
        let mut plan = state.clone();
        plan["name"] = json!("b");
        let err = SecretResource.update(&client, state, plan).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidAttribute { ref attribute, .. } if attribute == "name"));
    }
}
