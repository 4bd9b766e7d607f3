//! # API Types
//!
//! JSON payloads of the KMS and Secret Manager REST APIs.
//!
//! Fields use PascalCase on the wire; single objects are wrapped in an envelope
//! named after the object (`{"Key": {...}}`), lists in the plural (`{"Keys": [...]}`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Where the key material of a KMS key comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOrigin {
    #[default]
    Generated,
    Imported,
}

impl KeyOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyOrigin::Generated => "generated",
            KeyOrigin::Imported => "imported",
        }
    }
}

impl fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generated" => Ok(KeyOrigin::Generated),
            "imported" => Ok(KeyOrigin::Imported),
            other => Err(format!(
                "unsupported key origin {other:?}, expected \"generated\" or \"imported\""
            )),
        }
    }
}

/// KMS key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Key {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub key_origin: KeyOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Body of `POST /keys`
#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateKeyRequest {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub key_origin: KeyOrigin,
    /// Base64 key material, imported keys only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_key: Option<String>,
}

impl fmt::Debug for CreateKeyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateKeyRequest")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("tags", &self.tags)
            .field("key_origin", &self.key_origin)
            .field("plain_key", &self.plain_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Body of `PUT /keys/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateKeyRequest {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Secret Manager vault
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vault {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "KmsKeyID")]
    pub kms_key_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Body of `POST /vaults` and `PUT /vaults/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaultRequest {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "KmsKeyID")]
    pub kms_key_id: String,
}

/// Secret metadata as listed in a vault; the value is never listed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Secret {
    pub name: String,
    pub latest_version: i64,
}

/// Body of `POST /vaults/{id}/secrets`, creating a new version
#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutSecretRequest {
    pub name: String,
    pub value: Zeroizing<String>,
}

impl fmt::Debug for PutSecretRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutSecretRequest")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Body of `DELETE /vaults/{id}/secrets`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteSecretRequest {
    pub name: String,
}

/// Body of `POST /vaults/{id}/secrets/unveil`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnveilSecretRequest {
    pub name: String,
    /// Latest version when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// Decrypted secret returned by unveil
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnveiledSecret {
    pub name: String,
    pub value: Zeroizing<String>,
    pub version: i64,
}

impl fmt::Debug for UnveiledSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnveiledSecret")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

// Envelopes

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct KeyBody<T> {
    #[serde(rename = "Key")]
    pub key: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeysBody {
    #[serde(rename = "Keys", default)]
    pub keys: Vec<Key>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct VaultBody<T> {
    #[serde(rename = "Vault")]
    pub vault: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VaultsBody {
    #[serde(rename = "Vaults", default)]
    pub vaults: Vec<Vault>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SecretBody<T> {
    #[serde(rename = "Secret")]
    pub secret: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecretsBody {
    #[serde(rename = "Secrets", default)]
    pub secrets: Vec<Secret>,
}
