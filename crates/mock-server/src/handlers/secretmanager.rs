//! Secret Manager endpoints
//!
//! - `GET|POST /secretmanager/1.0/vaults`
//! - `GET|PUT|DELETE /secretmanager/1.0/vaults/{id}`
//! - `GET|POST|DELETE /secretmanager/1.0/vaults/{id}/secrets`
//! - `POST /secretmanager/1.0/vaults/{id}/secrets/unveil`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::errors::{bad_request, not_found};
use crate::store::VaultRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VaultEnvelope {
    #[serde(rename = "Vault")]
    pub vault: VaultBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaultBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "KmsKeyID", default)]
    pub kms_key_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SecretEnvelope<T> {
    #[serde(rename = "Secret")]
    pub secret: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutSecret {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnveilSecret {
    pub name: String,
    #[serde(default)]
    pub version: Option<i64>,
}

fn vault_response(status: StatusCode, vault: &VaultRecord) -> Response {
    (status, Json(json!({ "Vault": vault }))).into_response()
}

pub async fn list_vaults(State(state): State<AppState>) -> Response {
    let vaults = state.store.list_vaults().await;
    Json(json!({ "Count": vaults.len(), "Total": vaults.len(), "Vaults": vaults })).into_response()
}

pub async fn create_vault(
    State(state): State<AppState>,
    Json(body): Json<VaultEnvelope>,
) -> Response {
    let request = body.vault;
    if request.name.is_empty() {
        return bad_request("Name is required");
    }
    if state.store.get_key(&request.kms_key_id).await.is_none() {
        return bad_request(format!("KMS key {} does not exist", request.kms_key_id));
    }

    let now = Utc::now();
    let vault = VaultRecord {
        id: state.store.allocate_id(),
        name: request.name,
        description: request.description,
        tags: request.tags,
        kms_key_id: request.kms_key_id,
        created_at: now,
        modified_at: now,
    };
    info!(id = %vault.id, name = %vault.name, kms_key_id = %vault.kms_key_id, "created vault");
    state.store.insert_vault(vault.clone()).await;
    vault_response(StatusCode::CREATED, &vault)
}

pub async fn get_vault(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get_vault(&id).await {
        Some(vault) => vault_response(StatusCode::OK, &vault),
        None => not_found("vault", &id),
    }
}

pub async fn update_vault(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VaultEnvelope>,
) -> Response {
    let request = body.vault;
    if request.name.is_empty() {
        return bad_request("Name is required");
    }
    let Some(current) = state.store.get_vault(&id).await else {
        return not_found("vault", &id);
    };
    if !request.kms_key_id.is_empty() && request.kms_key_id != current.kms_key_id {
        return bad_request("KmsKeyID cannot be changed");
    }

    let updated = state
        .store
        .update_vault(&id, |vault| {
            vault.name = request.name;
            vault.description = request.description;
            vault.tags = request.tags;
        })
        .await;
    match updated {
        Some(vault) => vault_response(StatusCode::OK, &vault),
        None => not_found("vault", &id),
    }
}

pub async fn delete_vault(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.store.delete_vault(&id).await {
        info!(id = %id, "deleted vault");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("vault", &id)
    }
}

pub async fn list_secrets(State(state): State<AppState>, Path(vault_id): Path<String>) -> Response {
    if state.store.get_vault(&vault_id).await.is_none() {
        return not_found("vault", &vault_id);
    }
    let secrets: Vec<_> = state
        .store
        .list_secrets(&vault_id)
        .await
        .into_iter()
        .map(|(name, version)| json!({ "Name": name, "LatestVersion": version }))
        .collect();
    Json(json!({ "Count": secrets.len(), "Total": secrets.len(), "Secrets": secrets }))
        .into_response()
}

pub async fn put_secret(
    State(state): State<AppState>,
    Path(vault_id): Path<String>,
    Json(body): Json<SecretEnvelope<PutSecret>>,
) -> Response {
    let request = body.secret;
    if request.name.is_empty() {
        return bad_request("Name is required");
    }
    if state.store.get_vault(&vault_id).await.is_none() {
        return not_found("vault", &vault_id);
    }
    let version = state
        .store
        .put_secret(&vault_id, &request.name, request.value)
        .await;
    info!(vault_id = %vault_id, name = %request.name, version, "stored secret version");
    (
        StatusCode::CREATED,
        Json(json!({ "Secret": { "Name": request.name, "LatestVersion": version } })),
    )
        .into_response()
}

pub async fn unveil_secret(
    State(state): State<AppState>,
    Path(vault_id): Path<String>,
    Json(body): Json<SecretEnvelope<UnveilSecret>>,
) -> Response {
    let request = body.secret;
    let version = match request.version.map(usize::try_from).transpose() {
        Ok(version) => version,
        Err(_) => return bad_request("Version must be positive"),
    };
    match state.store.get_secret(&vault_id, &request.name, version).await {
        Some((value, version)) => Json(json!({
            "Secret": { "Name": request.name, "Value": value, "Version": version }
        }))
        .into_response(),
        None => not_found("secret", &format!("{vault_id}/{}", request.name)),
    }
}

pub async fn delete_secret(
    State(state): State<AppState>,
    Path(vault_id): Path<String>,
    Json(body): Json<SecretEnvelope<SecretName>>,
) -> Response {
    let name = body.secret.name;
    if state.store.delete_secret(&vault_id, &name).await {
        info!(vault_id = %vault_id, name = %name, "deleted secret");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("secret", &format!("{vault_id}/{name}"))
    }
}
