//! Request middleware: counting, fault injection and basic auth.

use std::sync::atomic::Ordering;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use crate::errors::sakura_error_response;
use crate::AppState;

/// Count every request and fail it with 503 while injected failures remain
pub async fn fault_injection_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let injected = state
        .fail_next
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if injected {
        warn!(path = %request.uri().path(), "injecting 503");
        return sakura_error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "service temporarily unavailable",
        );
    }
    next.run(request).await
}

/// Require HTTP basic auth matching the configured credentials
pub async fn auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some((token, secret)) = state.credentials.as_deref() else {
        return next.run(request).await;
    };

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok());

    match supplied {
        Some(pair) if pair == format!("{token}:{secret}") => next.run(request).await,
        _ => {
            debug!(path = %request.uri().path(), "rejecting unauthenticated request");
            sakura_error_response(StatusCode::UNAUTHORIZED, "invalid access token")
        }
    }
}
