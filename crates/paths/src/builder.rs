//! # Path Builder
//!
//! Builds API paths for an [`Operation`] in any [`PathFormat`].

use crate::errors::PathBuilderError;
use crate::formats::PathFormat;
use crate::operations::Operation;

/// Builder for API paths
///
/// ```
/// use paths::{KmsOperation, PathBuilder, PathFormat};
///
/// let path = PathBuilder::new(KmsOperation::GetKey)
///     .resource_id("110000000001")
///     .build(PathFormat::Relative)
///     .unwrap();
/// assert_eq!(path, "/keys/110000000001");
/// ```
#[derive(Debug, Clone)]
pub struct PathBuilder {
    operation: Operation,
    resource_id: Option<String>,
}

impl PathBuilder {
    pub fn new(operation: impl Into<Operation>) -> Self {
        Self {
            operation: operation.into(),
            resource_id: None,
        }
    }

    /// Set the resource id substituted for `{id}`
    #[must_use]
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn build(&self, format: PathFormat) -> Result<String, PathBuilderError> {
        let prefix = self.operation.service().prefix();
        let template = self.operation.template();

        if format == PathFormat::Route {
            return Ok(format!("{prefix}{template}"));
        }

        let relative = if self.operation.requires_id() {
            let id = self
                .resource_id
                .as_deref()
                .ok_or_else(|| PathBuilderError::MissingResourceId(format!("{:?}", self.operation)))?;
            if id.is_empty() || id.contains('/') {
                return Err(PathBuilderError::InvalidResourceId(id.to_string()));
            }
            template.replace("{id}", id)
        } else {
            template.to_string()
        };

        Ok(match format {
            PathFormat::Http => format!("{prefix}{relative}"),
            _ => relative,
        })
    }
}
