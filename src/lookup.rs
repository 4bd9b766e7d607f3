//! # Name Lookup
//!
//! Linear scans of a listed collection by display name. Names are not unique
//! in the remote APIs, so a lookup fails both when nothing matches and when
//! more than one object does.

use thiserror::Error;

use crate::client::types::{Key, Secret, Vault};

/// Objects that can be looked up by name
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Key {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Vault {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Secret {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no {kind} named {name:?} was found")]
    NotFound { kind: &'static str, name: String },

    #[error("{count} {kind}s named {name:?} were found, names must be unique to be looked up")]
    Ambiguous {
        kind: &'static str,
        name: String,
        count: usize,
    },
}

/// Return the single item whose name equals `name`
pub fn filter_by_name<'a, T: Named>(
    items: &'a [T],
    kind: &'static str,
    name: &str,
) -> Result<&'a T, LookupError> {
    let mut matches = items.iter().filter(|item| item.name() == name);
    match (matches.next(), matches.count()) {
        (Some(item), 0) => Ok(item),
        (None, _) => Err(LookupError::NotFound {
            kind,
            name: name.to_string(),
        }),
        (Some(_), rest) => Err(LookupError::Ambiguous {
            kind,
            name: name.to_string(),
            count: rest + 1,
        }),
    }
}

pub fn filter_kms_by_name<'a>(keys: &'a [Key], name: &str) -> Result<&'a Key, LookupError> {
    filter_by_name(keys, "KMS key", name)
}

pub fn filter_vault_by_name<'a>(vaults: &'a [Vault], name: &str) -> Result<&'a Vault, LookupError> {
    filter_by_name(vaults, "vault", name)
}

pub fn filter_secret_by_name<'a>(
    secrets: &'a [Secret],
    name: &str,
) -> Result<&'a Secret, LookupError> {
    filter_by_name(secrets, "secret", name)
}
