//! # Services
//!
//! Remote services addressed under the API root URL.

/// A versioned service mounted under the API root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Key Management Service
    Kms,
    /// Secret Manager (vaults and secrets)
    SecretManager,
}

impl Service {
    /// Path prefix of the service relative to the API root, e.g. `/kms/1.0`
    pub fn prefix(self) -> &'static str {
        match self {
            Service::Kms => "/kms/1.0",
            Service::SecretManager => "/secretmanager/1.0",
        }
    }

    /// Base URL of the service for a given API root URL
    ///
    /// Trailing slashes on the root are ignored.
    pub fn base_url(self, api_root_url: &str) -> String {
        format!("{}{}", api_root_url.trim_end_matches('/'), self.prefix())
    }
}
