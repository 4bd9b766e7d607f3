//! Shared API path definitions for KMS and Secret Manager
//!
//! This crate centralizes all API paths to ensure consistency
//! between the provider's REST client and the mock server.
//!
//! ## PathBuilder
//!
//! The `PathBuilder` provides a builder-pattern API for constructing
//! API paths in different output formats (axum routes, full HTTP paths,
//! paths relative to a service base URL).
//!
//! ## Route Constants
//!
//! Route constants are provided for Axum routes, which require static string literals.
//! These constants are validated against PathBuilder output in tests.

pub mod builder;
pub mod errors;
pub mod formats;
pub mod operations;
pub mod service;

pub use builder::PathBuilder;
pub use errors::PathBuilderError;
pub use formats::PathFormat;
pub use operations::{KmsOperation, Operation, SecretManagerOperation};
pub use service::Service;

/// Axum route constants for the KMS API
pub mod kms {
    pub const KEYS: &str = "/kms/1.0/keys";
    pub const KEY: &str = "/kms/1.0/keys/{id}";
}

/// Axum route constants for the Secret Manager API
pub mod secretmanager {
    pub const VAULTS: &str = "/secretmanager/1.0/vaults";
    pub const VAULT: &str = "/secretmanager/1.0/vaults/{id}";
    pub const SECRETS: &str = "/secretmanager/1.0/vaults/{id}/secrets";
    pub const UNVEIL: &str = "/secretmanager/1.0/vaults/{id}/secrets/unveil";
}
