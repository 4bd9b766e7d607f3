//! Helpers shared by the resource and data source models.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// Deserialize `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an attribute object; `null` decodes as the model's default
pub(crate) fn decode<T: DeserializeOwned + Default>(value: Value) -> Result<T, ProviderError> {
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn encode<T: Serialize>(model: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(model)?)
}

/// Fail when an attribute that forces replacement differs between states
pub(crate) fn ensure_unchanged<T: PartialEq + std::fmt::Debug>(
    attribute: &str,
    prior: &T,
    planned: &T,
) -> Result<(), ProviderError> {
    if prior == planned {
        return Ok(());
    }
    Err(ProviderError::invalid_attribute(
        attribute,
        format!(
            "changing {attribute} from {prior:?} to {planned:?} requires replacing the resource"
        ),
    ))
}

/// Fail when a required identifier is missing from state
pub(crate) fn require_id<'a>(attribute: &str, id: &'a str) -> Result<&'a str, ProviderError> {
    if id.is_empty() {
        return Err(ProviderError::invalid_attribute(
            attribute,
            format!("{attribute} is not set in state"),
        ));
    }
    Ok(id)
}
