//! KMS key endpoints
//!
//! - `GET /kms/1.0/keys`
//! - `POST /kms/1.0/keys`
//! - `GET|PUT|DELETE /kms/1.0/keys/{id}`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::errors::{bad_request, not_found};
use crate::store::KeyRecord;
use crate::AppState;

const PLAIN_KEY_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct KeyEnvelope<T> {
    #[serde(rename = "Key")]
    pub key: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateKey {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub key_origin: Option<String>,
    #[serde(default)]
    pub plain_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateKey {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn key_response(status: StatusCode, key: &KeyRecord) -> Response {
    (status, Json(json!({ "Key": key }))).into_response()
}

pub async fn list_keys(State(state): State<AppState>) -> Response {
    let keys = state.store.list_keys().await;
    Json(json!({ "Count": keys.len(), "Total": keys.len(), "Keys": keys })).into_response()
}

pub async fn create_key(
    State(state): State<AppState>,
    Json(body): Json<KeyEnvelope<CreateKey>>,
) -> Response {
    let request = body.key;
    if request.name.is_empty() {
        return bad_request("Name is required");
    }

    let key_origin = request.key_origin.unwrap_or_else(|| "generated".to_string());
    let plain_key = match (key_origin.as_str(), request.plain_key) {
        ("generated", None) => None,
        ("generated", Some(_)) => {
            return bad_request("PlainKey can only be set for imported keys");
        }
        ("imported", Some(encoded)) => match STANDARD.decode(encoded) {
            Ok(bytes) if bytes.len() == PLAIN_KEY_LEN => Some(bytes),
            Ok(bytes) => {
                return bad_request(format!(
                    "PlainKey must be {PLAIN_KEY_LEN} bytes, got {}",
                    bytes.len()
                ));
            }
            Err(e) => return bad_request(format!("PlainKey is not valid base64: {e}")),
        },
        ("imported", None) => return bad_request("PlainKey is required for imported keys"),
        (other, _) => return bad_request(format!("unsupported KeyOrigin {other:?}")),
    };

    let now = Utc::now();
    let key = KeyRecord {
        id: state.store.allocate_id(),
        name: request.name,
        description: request.description,
        tags: request.tags,
        key_origin,
        created_at: now,
        modified_at: now,
        plain_key,
    };
    info!(id = %key.id, name = %key.name, "created key");
    state.store.insert_key(key.clone()).await;
    key_response(StatusCode::CREATED, &key)
}

pub async fn get_key(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get_key(&id).await {
        Some(key) => key_response(StatusCode::OK, &key),
        None => not_found("key", &id),
    }
}

pub async fn update_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<KeyEnvelope<UpdateKey>>,
) -> Response {
    let request = body.key;
    if request.name.is_empty() {
        return bad_request("Name is required");
    }
    let updated = state
        .store
        .update_key(&id, |key| {
            key.name = request.name;
            key.description = request.description;
            key.tags = request.tags;
        })
        .await;
    match updated {
        Some(key) => key_response(StatusCode::OK, &key),
        None => not_found("key", &id),
    }
}

pub async fn delete_key(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.store.delete_key(&id).await {
        info!(id = %id, "deleted key");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("key", &id)
    }
}
