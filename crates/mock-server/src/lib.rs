//! In-memory mock of the Sakura Cloud KMS and Secret Manager REST APIs
//!
//! Serves the routes defined in the `paths` crate from a [`store::Store`],
//! with Sakura Cloud style error bodies. Used by the provider's integration
//! tests and runnable standalone as `sakura-mock-server`.
//!
//! Test hooks:
//! - [`MockServer::fail_next_requests`] answers the next N requests with 503
//! - [`MockServer::request_count`] counts every request received

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod store;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use handlers::{health_check, kms, secretmanager};
use store::Store;

/// Shared application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: Store,
    /// Expected `(token, secret)`; `None` accepts any request
    pub credentials: Option<Arc<(String, String)>>,
    pub fail_next: Arc<AtomicUsize>,
    pub requests: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(credentials: Option<(String, String)>) -> Self {
        Self {
            credentials: credentials.map(Arc::new),
            ..Self::default()
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route(paths::kms::KEYS, get(kms::list_keys).post(kms::create_key))
        .route(
            paths::kms::KEY,
            get(kms::get_key).put(kms::update_key).delete(kms::delete_key),
        )
        .route(
            paths::secretmanager::VAULTS,
            get(secretmanager::list_vaults).post(secretmanager::create_vault),
        )
        .route(
            paths::secretmanager::VAULT,
            get(secretmanager::get_vault)
                .put(secretmanager::update_vault)
                .delete(secretmanager::delete_vault),
        )
        .route(
            paths::secretmanager::SECRETS,
            get(secretmanager::list_secrets)
                .post(secretmanager::put_secret)
                .delete(secretmanager::delete_secret),
        )
        .route(
            paths::secretmanager::UNVEIL,
            post(secretmanager::unveil_secret),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::fault_injection_middleware,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::auth_middleware,
                )),
        )
        .with_state(state)
}

/// A mock server running on an ephemeral local port
///
/// The server task is aborted when this value is dropped.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: AppState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// API root URL, to be used as the provider's `api_root_url`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Answer the next `n` requests with 503 Service Unavailable
    pub fn fail_next_requests(&self, n: usize) {
        self.state.fail_next.store(n, Ordering::SeqCst);
    }

    /// Number of requests received so far, including injected failures
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a mock server on `127.0.0.1` with an OS-assigned port
pub async fn spawn(credentials: Option<(String, String)>) -> Result<MockServer> {
    let state = AppState::new(credentials);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind mock server")?;
    let addr = listener
        .local_addr()
        .context("Failed to read mock server address")?;

    let app = router(state.clone());
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "mock server stopped");
        }
    });
    info!(%addr, "mock server listening");

    Ok(MockServer {
        addr,
        state,
        handle,
    })
}
