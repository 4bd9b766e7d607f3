pub mod kms;
pub mod secretmanager;

use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

pub async fn health_check() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}
