//! # Schema
//!
//! Attribute schemas for the provider block, resources and data sources, plus the
//! configuration validation the engine runs before planning.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::diagnostics::Diagnostics;

/// Sakura Cloud resource ids are 12 digit numbers
static RESOURCE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{12}$").expect("resource id pattern is a valid regex")
});

/// Returns true if `value` looks like a Sakura Cloud resource id
pub fn is_resource_id(value: &str) -> bool {
    RESOURCE_ID.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int64,
    Bool,
    ListOfString,
}

impl AttributeType {
    fn matches(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int64 => value.is_i64(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::ListOfString => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Int64 => "number",
            AttributeType::Bool => "bool",
            AttributeType::ListOfString => "list of string",
        }
    }
}

/// Value-level validation applied to configured (non-null) values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum Validator {
    /// 12 digit resource id
    ResourceId,
    /// One of a fixed set of strings
    OneOf(Vec<String>),
    /// Non-empty string
    NotEmpty,
}

impl Validator {
    fn check(&self, value: &Value) -> Result<(), String> {
        let Some(text) = value.as_str() else {
            return Ok(());
        };
        match self {
            Validator::ResourceId if !is_resource_id(text) => {
                Err(format!("{text:?} is not a valid resource id (12 digits expected)"))
            }
            Validator::OneOf(allowed) if !allowed.iter().any(|a| a == text) => Err(format!(
                "{text:?} must be one of: {}",
                allowed.join(", ")
            )),
            Validator::NotEmpty if text.is_empty() => Err("value must not be empty".to_string()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn new(kind: AttributeType) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
            description: String::new(),
            validators: Vec::new(),
        }
    }

    pub fn required(kind: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(kind)
        }
    }

    pub fn optional(kind: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(kind)
        }
    }

    pub fn computed(kind: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(kind)
        }
    }

    pub fn required_string() -> Self {
        Self::required(AttributeType::String)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttributeType::String)
    }

    pub fn computed_string() -> Self {
        Self::computed(AttributeType::String)
    }

    /// Optional attribute whose value the provider fills in when left unset
    #[must_use]
    pub fn and_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    fn is_configurable(&self) -> bool {
        self.required || self.optional
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub version: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exactly_one_of: Vec<Vec<String>>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Require exactly one of the named attributes to be configured
    #[must_use]
    pub fn with_exactly_one_of(mut self, names: &[&str]) -> Self {
        self.exactly_one_of
            .push(names.iter().map(|n| (*n).to_string()).collect());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validate a configuration object against the schema
    ///
    /// A `null` configuration is treated as an empty object.
    pub fn validate(&self, config: &Value) -> Diagnostics {
        self.check(config, false)
    }

    /// Validate a planned state before it reaches a resource
    ///
    /// Same rules as [`Schema::validate`], except computed attributes may carry
    /// values the engine copied from prior state.
    pub fn validate_planned(&self, planned_state: &Value) -> Diagnostics {
        self.check(planned_state, true)
    }

    fn check(&self, config: &Value, allow_computed: bool) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let empty = serde_json::Map::new();
        let object = match config {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                diags.add_error(
                    "Invalid configuration",
                    format!("expected an object, got {other}"),
                );
                return diags;
            }
        };

        for key in object.keys() {
            if !self.attributes.contains_key(key) {
                diags.add_attribute_error(
                    key.clone(),
                    "Unsupported argument",
                    format!("An argument named {key:?} is not expected here."),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            let value = object.get(name).unwrap_or(&Value::Null);
            if value.is_null() {
                if attribute.required {
                    diags.add_attribute_error(
                        name.clone(),
                        "Missing required argument",
                        format!("The argument {name:?} is required, but no definition was found."),
                    );
                }
                continue;
            }
            if !allow_computed && !attribute.is_configurable() {
                diags.add_attribute_error(
                    name.clone(),
                    "Invalid configuration",
                    format!("{name:?} is computed by the provider and cannot be set."),
                );
                continue;
            }
            if !attribute.kind.matches(value) {
                diags.add_attribute_error(
                    name.clone(),
                    "Incorrect attribute value type",
                    format!("{name:?} must be a {}.", attribute.kind.describe()),
                );
                continue;
            }
            for validator in &attribute.validators {
                if let Err(message) = validator.check(value) {
                    diags.add_attribute_error(name.clone(), "Invalid attribute value", message);
                }
            }
        }

        for group in &self.exactly_one_of {
            let set: Vec<&String> = group
                .iter()
                .filter(|name| object.get(*name).is_some_and(|v| !v.is_null()))
                .collect();
            if set.len() != 1 {
                diags.add_error(
                    "Invalid attribute combination",
                    format!(
                        "Exactly one of these attributes must be configured: [{}]",
                        group.join(", ")
                    ),
                );
            }
        }

        diags
    }
}

/// Full provider schema returned by `get_schema`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<String, Schema>,
    pub data_source_schemas: BTreeMap<String, Schema>,
}
