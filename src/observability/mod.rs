//! # Observability
//!
//! Structured logging for the provider process. Logs go to stderr; stdout is
//! reserved for protocol responses.

use tracing_subscriber::EnvFilter;

use crate::client::TraceMode;
use crate::constants::{DEFAULT_LOG_FILTER, ENV_TRACE};

/// Filter used when `RUST_LOG` is not set
///
/// An enabled `SAKURACLOUD_TRACE` mode raises the provider to `debug`.
pub fn default_filter(trace: Option<&str>) -> String {
    let enabled = trace
        .is_some_and(|value| value.parse::<TraceMode>().is_ok_and(TraceMode::is_enabled));
    if enabled {
        "terraform_provider_sakura=debug".to_string()
    } else {
        DEFAULT_LOG_FILTER.to_string()
    }
}

/// Install the global `tracing` subscriber
///
/// Returns an error if a subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    let trace = std::env::var(ENV_TRACE).ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(trace.as_deref()).into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))
}
