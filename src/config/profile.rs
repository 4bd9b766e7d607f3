//! # Profile Files
//!
//! usacloud-style profiles stored as `<dir>/<name>/config.json`. Profiles sit
//! below environment variables in the configuration precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::error::ConfigError;
use crate::constants::{DEFAULT_PROFILE_DIR_NAME, DEFAULT_PROFILE_NAME};

const PROFILE_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Profile {
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub zone: Option<String>,
    pub zones: Option<Vec<String>>,
    pub default_zone: Option<String>,
    #[serde(rename = "APIRootURL")]
    pub api_root_url: Option<String>,
    pub retry_max: Option<i64>,
    pub retry_wait_max: Option<i64>,
    pub retry_wait_min: Option<i64>,
    #[serde(rename = "HTTPRequestTimeout")]
    pub http_request_timeout: Option<i64>,
    #[serde(rename = "HTTPRequestRateLimit")]
    pub http_request_rate_limit: Option<i64>,
    pub trace_mode: Option<String>,
}

impl Profile {
    /// Load the named profile
    ///
    /// `dir` overrides the profile directory (`~/.usacloud` otherwise). A missing
    /// file is only an error for an explicitly named profile.
    pub fn load(name: &str, dir: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(base) = dir.map(Path::to_path_buf).or_else(default_profile_dir) else {
            debug!("no home directory, skipping profile lookup");
            return Ok(Self::default());
        };
        let path = base.join(name).join(PROFILE_FILE_NAME);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if name == DEFAULT_PROFILE_NAME {
                    debug!(path = %path.display(), "default profile not present");
                    return Ok(Self::default());
                }
                return Err(ConfigError::ProfileNotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(source) => return Err(ConfigError::ProfileRead { path, source }),
        };

        let profile = serde_json::from_str(&contents)
            .map_err(|source| ConfigError::ProfileParse {
                path: path.clone(),
                source,
            })?;
        debug!(profile = name, path = %path.display(), "loaded profile");
        Ok(profile)
    }
}

fn default_profile_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_PROFILE_DIR_NAME))
}
