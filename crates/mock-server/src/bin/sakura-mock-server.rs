//! Sakura Cloud KMS / Secret Manager mock server
//!
//! Environment Variables:
//! - PORT: Port to listen on (default: 8080)
//! - MOCK_ACCESS_TOKEN / MOCK_ACCESS_TOKEN_SECRET: credentials to require (default: accept any)

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use mock_server::{router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_server=info,tower_http=info".into()),
        )
        .with_target(false)
        .init();

    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .context("PORT must be a valid u16")?;
    let credentials = match (
        env::var("MOCK_ACCESS_TOKEN"),
        env::var("MOCK_ACCESS_TOKEN_SECRET"),
    ) {
        (Ok(token), Ok(secret)) => Some((token, secret)),
        _ => None,
    };

    let app = router(AppState::new(credentials));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Mock server ready at http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
