//! In-memory API implementations for unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::client::types::{
    CreateKeyRequest, DeleteSecretRequest, Key, PutSecretRequest, Secret, UnveilSecretRequest,
    UnveiledSecret, UpdateKeyRequest, Vault, VaultRequest,
};
use crate::client::{ApiClient, ApiError, KmsApi, SecretManagerApi};

fn not_found(path: String) -> ApiError {
    ApiError::NotFound {
        path,
        message: "not found".to_string(),
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeKms {
    next_id: AtomicU64,
    pub keys: Mutex<Vec<Key>>,
}

impl FakeKms {
    fn allocate_id(&self) -> String {
        (110_000_000_001 + self.next_id.fetch_add(1, Ordering::SeqCst)).to_string()
    }
}

#[async_trait]
impl KmsApi for FakeKms {
    async fn list_keys(&self) -> Result<Vec<Key>, ApiError> {
        Ok(self.keys.lock().unwrap().clone())
    }

    async fn create_key(&self, request: &CreateKeyRequest) -> Result<Key, ApiError> {
        let key = Key {
            id: self.allocate_id(),
            name: request.name.clone(),
            description: request.description.clone(),
            tags: request.tags.clone(),
            key_origin: request.key_origin,
            ..Key::default()
        };
        self.keys.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn read_key(&self, id: &str) -> Result<Key, ApiError> {
        self.keys
            .lock()
            .unwrap()
            .iter()
            .find(|k| k.id == id)
            .cloned()
            .ok_or_else(|| not_found(format!("/keys/{id}")))
    }

    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<Key, ApiError> {
        let mut keys = self.keys.lock().unwrap();
        let key = keys
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| not_found(format!("/keys/{id}")))?;
        key.name.clone_from(&request.name);
        key.description.clone_from(&request.description);
        key.tags.clone_from(&request.tags);
        Ok(key.clone())
    }

    async fn delete_key(&self, id: &str) -> Result<(), ApiError> {
        let mut keys = self.keys.lock().unwrap();
        let before = keys.len();
        keys.retain(|k| k.id != id);
        if keys.len() == before {
            return Err(not_found(format!("/keys/{id}")));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeSecretManager {
    next_id: AtomicU64,
    pub vaults: Mutex<Vec<Vault>>,
    /// (vault id, secret name) -> versions, oldest first
    pub secrets: Mutex<BTreeMap<(String, String), Vec<String>>>,
}

impl FakeSecretManager {
    fn vault_exists(&self, id: &str) -> Result<(), ApiError> {
        if self.vaults.lock().unwrap().iter().any(|v| v.id == id) {
            Ok(())
        } else {
            Err(not_found(format!("/vaults/{id}")))
        }
    }
}

#[async_trait]
impl SecretManagerApi for FakeSecretManager {
    async fn list_vaults(&self) -> Result<Vec<Vault>, ApiError> {
        Ok(self.vaults.lock().unwrap().clone())
    }

    async fn create_vault(&self, request: &VaultRequest) -> Result<Vault, ApiError> {
        let vault = Vault {
            id: (120_000_000_001 + self.next_id.fetch_add(1, Ordering::SeqCst)).to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            tags: request.tags.clone(),
            kms_key_id: request.kms_key_id.clone(),
            ..Vault::default()
        };
        self.vaults.lock().unwrap().push(vault.clone());
        Ok(vault)
    }

    async fn read_vault(&self, id: &str) -> Result<Vault, ApiError> {
        self.vaults
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| not_found(format!("/vaults/{id}")))
    }

    async fn update_vault(&self, id: &str, request: &VaultRequest) -> Result<Vault, ApiError> {
        let mut vaults = self.vaults.lock().unwrap();
        let vault = vaults
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| not_found(format!("/vaults/{id}")))?;
        vault.name.clone_from(&request.name);
        vault.description.clone_from(&request.description);
        vault.tags.clone_from(&request.tags);
        Ok(vault.clone())
    }

    async fn delete_vault(&self, id: &str) -> Result<(), ApiError> {
        let mut vaults = self.vaults.lock().unwrap();
        let before = vaults.len();
        vaults.retain(|v| v.id != id);
        if vaults.len() == before {
            return Err(not_found(format!("/vaults/{id}")));
        }
        Ok(())
    }

    async fn list_secrets(&self, vault_id: &str) -> Result<Vec<Secret>, ApiError> {
        self.vault_exists(vault_id)?;
        Ok(self
            .secrets
            .lock()
            .unwrap()
            .iter()
            .filter(|((vault, _), _)| vault == vault_id)
            .map(|((_, name), versions)| Secret {
                name: name.clone(),
                latest_version: i64::try_from(versions.len()).unwrap(),
            })
            .collect())
    }

    async fn put_secret(
        &self,
        vault_id: &str,
        request: &PutSecretRequest,
    ) -> Result<Secret, ApiError> {
        self.vault_exists(vault_id)?;
        let mut secrets = self.secrets.lock().unwrap();
        let versions = secrets
            .entry((vault_id.to_string(), request.name.clone()))
            .or_default();
        versions.push(request.value.as_str().to_owned());
        Ok(Secret {
            name: request.name.clone(),
            latest_version: i64::try_from(versions.len()).unwrap(),
        })
    }

    async fn unveil_secret(
        &self,
        vault_id: &str,
        request: &UnveilSecretRequest,
    ) -> Result<UnveiledSecret, ApiError> {
        let secrets = self.secrets.lock().unwrap();
        let versions = secrets
            .get(&(vault_id.to_string(), request.name.clone()))
            .ok_or_else(|| not_found(format!("/vaults/{vault_id}/secrets/{}", request.name)))?;
        let version = request
            .version
            .unwrap_or_else(|| i64::try_from(versions.len()).unwrap());
        let value = usize::try_from(version - 1)
            .ok()
            .and_then(|index| versions.get(index))
            .ok_or_else(|| not_found(format!("/vaults/{vault_id}/secrets/{}", request.name)))?;
        Ok(UnveiledSecret {
            name: request.name.clone(),
            value: Zeroizing::new(value.clone()),
            version,
        })
    }

    async fn delete_secret(
        &self,
        vault_id: &str,
        request: &DeleteSecretRequest,
    ) -> Result<(), ApiError> {
        self.secrets
            .lock()
            .unwrap()
            .remove(&(vault_id.to_string(), request.name.clone()))
            .map(|_| ())
            .ok_or_else(|| not_found(format!("/vaults/{vault_id}/secrets/{}", request.name)))
    }
}

pub(crate) fn client() -> (ApiClient, Arc<FakeKms>, Arc<FakeSecretManager>) {
    let kms = Arc::new(FakeKms::default());
    let secret_manager = Arc::new(FakeSecretManager::default());
    let client = ApiClient::from_parts(
        Arc::clone(&kms) as Arc<dyn KmsApi>,
        Arc::clone(&secret_manager) as Arc<dyn SecretManagerApi>,
    );
    (client, kms, secret_manager)
}
