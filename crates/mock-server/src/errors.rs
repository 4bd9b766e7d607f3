//! Sakura Cloud style error responses
//!
//! Format: `{"is_fatal": true, "serial": "...", "status": "404 Not Found", "error_code": "not_found", "error_msg": "..."}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Error code strings used by the API
pub mod error_codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const CONFLICT: &str = "conflict";
    pub const SERVICE_UNAVAILABLE: &str = "service_unavailable";
}

pub fn error_code_from_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => error_codes::NOT_FOUND,
        StatusCode::UNAUTHORIZED => error_codes::UNAUTHORIZED,
        StatusCode::CONFLICT => error_codes::CONFLICT,
        StatusCode::SERVICE_UNAVAILABLE => error_codes::SERVICE_UNAVAILABLE,
        _ => error_codes::BAD_REQUEST,
    }
}

pub fn sakura_error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "is_fatal": true,
            "serial": "mock",
            "status": status.to_string(),
            "error_code": error_code_from_status(status),
            "error_msg": message.into(),
        })),
    )
        .into_response()
}

pub fn not_found(kind: &str, id: &str) -> Response {
    sakura_error_response(StatusCode::NOT_FOUND, format!("{kind} {id} not found"))
}

pub fn bad_request(message: impl Into<String>) -> Response {
    sakura_error_response(StatusCode::BAD_REQUEST, message)
}
