//! In-memory storage for keys, vaults and secret versions.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// First id handed out; Sakura Cloud ids are 12 digits
const FIRST_ID: u64 = 110_000_000_001;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyRecord {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub key_origin: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Never returned by the API
    #[serde(skip)]
    pub plain_key: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaultRecord {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "KmsKeyID")]
    pub kms_key_id: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    keys: BTreeMap<String, KeyRecord>,
    vaults: BTreeMap<String, VaultRecord>,
    /// vault id -> secret name -> versions, oldest first
    secrets: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// Shared store; clones refer to the same data
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
    next_id: Arc<AtomicU64>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&self) -> String {
        (FIRST_ID + self.next_id.fetch_add(1, Ordering::SeqCst)).to_string()
    }

    // Keys

    pub async fn list_keys(&self) -> Vec<KeyRecord> {
        self.inner.read().await.keys.values().cloned().collect()
    }

    pub async fn insert_key(&self, key: KeyRecord) {
        self.inner.write().await.keys.insert(key.id.clone(), key);
    }

    pub async fn get_key(&self, id: &str) -> Option<KeyRecord> {
        self.inner.read().await.keys.get(id).cloned()
    }

    /// Apply `update` to a key, returning the updated record
    pub async fn update_key<F>(&self, id: &str, update: F) -> Option<KeyRecord>
    where
        F: FnOnce(&mut KeyRecord),
    {
        let mut inner = self.inner.write().await;
        let key = inner.keys.get_mut(id)?;
        update(key);
        key.modified_at = Utc::now();
        Some(key.clone())
    }

    pub async fn delete_key(&self, id: &str) -> bool {
        self.inner.write().await.keys.remove(id).is_some()
    }

    // Vaults

    pub async fn list_vaults(&self) -> Vec<VaultRecord> {
        self.inner.read().await.vaults.values().cloned().collect()
    }

    pub async fn insert_vault(&self, vault: VaultRecord) {
        self.inner
            .write()
            .await
            .vaults
            .insert(vault.id.clone(), vault);
    }

    pub async fn get_vault(&self, id: &str) -> Option<VaultRecord> {
        self.inner.read().await.vaults.get(id).cloned()
    }

    pub async fn update_vault<F>(&self, id: &str, update: F) -> Option<VaultRecord>
    where
        F: FnOnce(&mut VaultRecord),
    {
        let mut inner = self.inner.write().await;
        let vault = inner.vaults.get_mut(id)?;
        update(vault);
        vault.modified_at = Utc::now();
        Some(vault.clone())
    }

    /// Deleting a vault drops its secrets
    pub async fn delete_vault(&self, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        inner.secrets.remove(id);
        inner.vaults.remove(id).is_some()
    }

    // Secrets

    /// `(name, latest version)` pairs of a vault
    pub async fn list_secrets(&self, vault_id: &str) -> Vec<(String, usize)> {
        self.inner
            .read()
            .await
            .secrets
            .get(vault_id)
            .map(|secrets| {
                secrets
                    .iter()
                    .map(|(name, versions)| (name.clone(), versions.len()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append a version, returning the new version number
    pub async fn put_secret(&self, vault_id: &str, name: &str, value: String) -> usize {
        let mut inner = self.inner.write().await;
        let versions = inner
            .secrets
            .entry(vault_id.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default();
        versions.push(value);
        versions.len()
    }

    /// Value of `version` (1-based), or of the latest version when `None`
    pub async fn get_secret(
        &self,
        vault_id: &str,
        name: &str,
        version: Option<usize>,
    ) -> Option<(String, usize)> {
        let inner = self.inner.read().await;
        let versions = inner.secrets.get(vault_id)?.get(name)?;
        let version = version.unwrap_or(versions.len());
        let value = versions.get(version.checked_sub(1)?)?;
        Some((value.clone(), version))
    }

    pub async fn delete_secret(&self, vault_id: &str, name: &str) -> bool {
        self.inner
            .write()
            .await
            .secrets
            .get_mut(vault_id)
            .and_then(|secrets| secrets.remove(name))
            .is_some()
    }
}
