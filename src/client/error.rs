//! # API Errors

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote object does not exist (HTTP 404)
    #[error("{path} not found: {message}")]
    NotFound { path: String, message: String },

    /// Any other non-success status, after retries were exhausted
    #[error("API returned {status} for {path}: {message}")]
    Status {
        status: StatusCode,
        path: String,
        message: String,
    },

    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request path: {0}")]
    Path(#[from] paths::PathBuilderError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Build an error from a non-success response
    ///
    /// Sakura Cloud error bodies look like
    /// `{"is_fatal": true, "status": "404 Not Found", "error_code": "not_found", "error_msg": "..."}`.
    /// When the body is not in that shape the raw text is used as the message.
    pub(crate) fn from_response(status: StatusCode, path: &str, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error_msg.or(b.error_code))
            .unwrap_or_else(|| body.trim().to_string());

        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound {
                path: path.to_string(),
                message,
            }
        } else {
            ApiError::Status {
                status,
                path: path.to_string(),
                message,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_msg: Option<String>,
}
