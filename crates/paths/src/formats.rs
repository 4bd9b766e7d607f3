//! # Path Formats

/// Output format for a built path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFormat {
    /// Axum route with `{id}` placeholder, including the service prefix
    Route,
    /// Concrete path including the service prefix, e.g. `/kms/1.0/keys/123`
    Http,
    /// Concrete path relative to the service base URL, e.g. `/keys/123`
    Relative,
}
