//! Provider integration tests against the mock server, organized by resource.

pub mod client;
pub mod common;
pub mod kms;
pub mod plugin;
pub mod secretmanager;
pub mod secretmanager_secret;
