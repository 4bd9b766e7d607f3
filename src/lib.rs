//! # Terraform Provider for Sakura Cloud KMS and Secret Manager
//!
//! Exposes KMS keys, Secret Manager vaults and Secret Manager secrets as
//! declarative resources and data sources.
//!
//! Each provider invocation handles exactly one engine operation:
//!
//! 1. **Configure** - profile file, environment variables and the provider block are
//!    merged into a [`config::ProviderConfig`] (explicit attributes win)
//! 2. **Build the client** - an [`client::ApiClient`] with basic auth, timeout, retry and
//!    rate limiting
//! 3. **Dispatch** - the resource or data source named in the request maps the operation
//!    onto one or two API calls and projects the response back into attributes
//!
//! See [`plugin`] for the request/response envelope spoken on stdin/stdout.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod lookup;
pub mod observability;
pub mod plugin;
pub mod provider;

pub use error::ProviderError;
pub use provider::SakuraProvider;
