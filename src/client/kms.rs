//! # KMS Client
//!
//! Key lifecycle calls against the KMS API.

use async_trait::async_trait;
use paths::KmsOperation;
use tracing::debug;

use super::error::ApiError;
use super::http::HttpTransport;
use super::types::{CreateKeyRequest, Key, KeyBody, KeysBody, UpdateKeyRequest};

/// KMS key operations
#[async_trait]
pub trait KmsApi: Send + Sync + std::fmt::Debug {
    async fn list_keys(&self) -> Result<Vec<Key>, ApiError>;

    async fn create_key(&self, request: &CreateKeyRequest) -> Result<Key, ApiError>;

    async fn read_key(&self, id: &str) -> Result<Key, ApiError>;

    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<Key, ApiError>;

    async fn delete_key(&self, id: &str) -> Result<(), ApiError>;
}

/// REST implementation of [`KmsApi`]
#[derive(Debug, Clone)]
pub struct KmsRest {
    transport: HttpTransport,
}

impl KmsRest {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl KmsApi for KmsRest {
    async fn list_keys(&self) -> Result<Vec<Key>, ApiError> {
        let body: KeysBody = self
            .transport
            .send::<(), _>(KmsOperation::ListKeys, None, None)
            .await?;
        debug!(count = body.keys.len(), "listed KMS keys");
        Ok(body.keys)
    }

    async fn create_key(&self, request: &CreateKeyRequest) -> Result<Key, ApiError> {
        let body: KeyBody<Key> = self
            .transport
            .send(KmsOperation::CreateKey, None, Some(&KeyBody { key: request }))
            .await?;
        Ok(body.key)
    }

    async fn read_key(&self, id: &str) -> Result<Key, ApiError> {
        let body: KeyBody<Key> = self
            .transport
            .send::<(), _>(KmsOperation::GetKey, Some(id), None)
            .await?;
        Ok(body.key)
    }

    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<Key, ApiError> {
        let body: KeyBody<Key> = self
            .transport
            .send(KmsOperation::UpdateKey, Some(id), Some(&KeyBody { key: request }))
            .await?;
        Ok(body.key)
    }

    async fn delete_key(&self, id: &str) -> Result<(), ApiError> {
        self.transport
            .send_empty::<()>(KmsOperation::DeleteKey, Some(id), None)
            .await
    }
}
