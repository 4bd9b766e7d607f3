//! # Secret Manager Client
//!
//! Vault lifecycle and secret versioning calls. Secrets are addressed by
//! `(vault_id, name)`; every put creates a new version.

use async_trait::async_trait;
use paths::SecretManagerOperation;
use tracing::debug;

use super::error::ApiError;
use super::http::HttpTransport;
use super::types::{
    DeleteSecretRequest, PutSecretRequest, Secret, SecretBody, SecretsBody, UnveilSecretRequest,
    UnveiledSecret, Vault, VaultBody, VaultRequest, VaultsBody,
};

#[async_trait]
pub trait SecretManagerApi: Send + Sync + std::fmt::Debug {
    async fn list_vaults(&self) -> Result<Vec<Vault>, ApiError>;

    async fn create_vault(&self, request: &VaultRequest) -> Result<Vault, ApiError>;

    async fn read_vault(&self, id: &str) -> Result<Vault, ApiError>;

    async fn update_vault(&self, id: &str, request: &VaultRequest) -> Result<Vault, ApiError>;

    async fn delete_vault(&self, id: &str) -> Result<(), ApiError>;

    async fn list_secrets(&self, vault_id: &str) -> Result<Vec<Secret>, ApiError>;

    /// Store a new version of the named secret, creating it if needed
    async fn put_secret(&self, vault_id: &str, request: &PutSecretRequest)
        -> Result<Secret, ApiError>;

    /// Reveal a secret value; `version: None` means the latest version
    async fn unveil_secret(
        &self,
        vault_id: &str,
        request: &UnveilSecretRequest,
    ) -> Result<UnveiledSecret, ApiError>;

    async fn delete_secret(&self, vault_id: &str, request: &DeleteSecretRequest)
        -> Result<(), ApiError>;
}

/// REST implementation of [`SecretManagerApi`]
#[derive(Debug, Clone)]
pub struct SecretManagerRest {
    transport: HttpTransport,
}

impl SecretManagerRest {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SecretManagerApi for SecretManagerRest {
    async fn list_vaults(&self) -> Result<Vec<Vault>, ApiError> {
        let body: VaultsBody = self
            .transport
            .send::<(), _>(SecretManagerOperation::ListVaults, None, None)
            .await?;
        debug!(count = body.vaults.len(), "listed vaults");
        Ok(body.vaults)
    }

    async fn create_vault(&self, request: &VaultRequest) -> Result<Vault, ApiError> {
        let body: VaultBody<Vault> = self
            .transport
            .send(
                SecretManagerOperation::CreateVault,
                None,
                Some(&VaultBody { vault: request }),
            )
            .await?;
        Ok(body.vault)
    }

    async fn read_vault(&self, id: &str) -> Result<Vault, ApiError> {
        let body: VaultBody<Vault> = self
            .transport
            .send::<(), _>(SecretManagerOperation::GetVault, Some(id), None)
            .await?;
        Ok(body.vault)
    }

    async fn update_vault(&self, id: &str, request: &VaultRequest) -> Result<Vault, ApiError> {
        let body: VaultBody<Vault> = self
            .transport
            .send(
                SecretManagerOperation::UpdateVault,
                Some(id),
                Some(&VaultBody { vault: request }),
            )
            .await?;
        Ok(body.vault)
    }

    async fn delete_vault(&self, id: &str) -> Result<(), ApiError> {
        self.transport
            .send_empty::<()>(SecretManagerOperation::DeleteVault, Some(id), None)
            .await
    }

    async fn list_secrets(&self, vault_id: &str) -> Result<Vec<Secret>, ApiError> {
        let body: SecretsBody = self
            .transport
            .send::<(), _>(SecretManagerOperation::ListSecrets, Some(vault_id), None)
            .await?;
        debug!(vault_id, count = body.secrets.len(), "listed secrets");
        Ok(body.secrets)
    }

    async fn put_secret(
        &self,
        vault_id: &str,
        request: &PutSecretRequest,
    ) -> Result<Secret, ApiError> {
        let body: SecretBody<Secret> = self
            .transport
            .send(
                SecretManagerOperation::PutSecret,
                Some(vault_id),
                Some(&SecretBody { secret: request }),
            )
            .await?;
        Ok(body.secret)
    }

    async fn unveil_secret(
        &self,
        vault_id: &str,
        request: &UnveilSecretRequest,
    ) -> Result<UnveiledSecret, ApiError> {
        let body: SecretBody<UnveiledSecret> = self
            .transport
            .send(
                SecretManagerOperation::UnveilSecret,
                Some(vault_id),
                Some(&SecretBody { secret: request }),
            )
            .await?;
        Ok(body.secret)
    }

    async fn delete_secret(
        &self,
        vault_id: &str,
        request: &DeleteSecretRequest,
    ) -> Result<(), ApiError> {
        self.transport
            .send_empty(
                SecretManagerOperation::DeleteSecret,
                Some(vault_id),
                Some(&SecretBody { secret: request }),
            )
            .await
    }
}
