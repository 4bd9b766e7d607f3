//! # Constants
//!
//! Environment variable names and built-in defaults for the provider configuration.

/// Provider type name, used as the prefix of every resource and data source
pub const PROVIDER_TYPE_NAME: &str = "sakura";

// Environment variables
pub const ENV_PROFILE: &str = "SAKURACLOUD_PROFILE";
pub const ENV_PROFILE_DIR: &str = "SAKURACLOUD_PROFILE_DIR";
pub const ENV_ACCESS_TOKEN: &str = "SAKURACLOUD_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "SAKURACLOUD_ACCESS_TOKEN_SECRET";
pub const ENV_ZONE: &str = "SAKURACLOUD_ZONE";
pub const ENV_ZONES: &str = "SAKURACLOUD_ZONES";
pub const ENV_DEFAULT_ZONE: &str = "SAKURACLOUD_DEFAULT_ZONE";
pub const ENV_API_ROOT_URL: &str = "SAKURACLOUD_API_ROOT_URL";
pub const ENV_RETRY_MAX: &str = "SAKURACLOUD_RETRY_MAX";
pub const ENV_RETRY_WAIT_MAX: &str = "SAKURACLOUD_RETRY_WAIT_MAX";
pub const ENV_RETRY_WAIT_MIN: &str = "SAKURACLOUD_RETRY_WAIT_MIN";
pub const ENV_API_REQUEST_TIMEOUT: &str = "SAKURACLOUD_API_REQUEST_TIMEOUT";
pub const ENV_RATE_LIMIT: &str = "SAKURACLOUD_RATE_LIMIT";
pub const ENV_TRACE: &str = "SAKURACLOUD_TRACE";

// Defaults
pub const DEFAULT_PROFILE_NAME: &str = "default";
pub const DEFAULT_PROFILE_DIR_NAME: &str = ".usacloud";
pub const DEFAULT_ZONE: &str = "is1b";
pub const DEFAULT_ZONES: &[&str] = &["is1a", "is1b", "tk1a", "tk1b", "tk1v"];
pub const DEFAULT_API_ROOT_URL: &str = "https://secure.sakura.ad.jp/cloud/api";
pub const DEFAULT_RETRY_MAX: i64 = 100;
pub const DEFAULT_API_REQUEST_TIMEOUT_SECS: i64 = 300;
pub const DEFAULT_API_REQUEST_RATE_LIMIT: i64 = 10;

/// Retry wait bounds used by the client when the configuration leaves them at zero
pub const CLIENT_RETRY_WAIT_MIN_SECS: u64 = 1;
pub const CLIENT_RETRY_WAIT_MAX_SECS: u64 = 64;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "terraform_provider_sakura=info";
