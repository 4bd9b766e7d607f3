//! # Path Builder Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathBuilderError {
    #[error("operation {0} requires a resource id")]
    MissingResourceId(String),
    #[error("resource id must not be empty or contain '/': {0:?}")]
    InvalidResourceId(String),
}
