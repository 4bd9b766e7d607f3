//! # Trace Mode
//!
//! Controls logging of API requests and responses.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceMode {
    #[default]
    Off,
    /// Log API operations (method, path, status)
    Api,
    /// Log full HTTP request and response bodies
    Http,
    /// Both of the above
    All,
}

impl TraceMode {
    pub fn is_enabled(self) -> bool {
        self != TraceMode::Off
    }

    pub fn logs_api(self) -> bool {
        matches!(self, TraceMode::Api | TraceMode::All)
    }

    pub fn logs_http(self) -> bool {
        matches!(self, TraceMode::Http | TraceMode::All)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trace mode {0:?}, expected one of: all, api, http")]
pub struct ParseTraceModeError(pub String);

impl FromStr for TraceMode {
    type Err = ParseTraceModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "off" => Ok(TraceMode::Off),
            "api" => Ok(TraceMode::Api),
            "http" => Ok(TraceMode::Http),
            "all" | "1" | "true" => Ok(TraceMode::All),
            _ => Err(ParseTraceModeError(s.to_string())),
        }
    }
}

impl fmt::Display for TraceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraceMode::Off => "off",
            TraceMode::Api => "api",
            TraceMode::Http => "http",
            TraceMode::All => "all",
        })
    }
}
