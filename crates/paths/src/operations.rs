//! # Operations
//!
//! Every remote call the provider makes, grouped by service.

use crate::service::Service;

/// KMS API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmsOperation {
    ListKeys,
    CreateKey,
    GetKey,
    UpdateKey,
    DeleteKey,
}

/// Secret Manager API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretManagerOperation {
    ListVaults,
    CreateVault,
    GetVault,
    UpdateVault,
    DeleteVault,
    ListSecrets,
    PutSecret,
    DeleteSecret,
    UnveilSecret,
}

/// Operation on any service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Kms(KmsOperation),
    SecretManager(SecretManagerOperation),
}

impl From<KmsOperation> for Operation {
    fn from(op: KmsOperation) -> Self {
        Operation::Kms(op)
    }
}

impl From<SecretManagerOperation> for Operation {
    fn from(op: SecretManagerOperation) -> Self {
        Operation::SecretManager(op)
    }
}

impl Operation {
    pub fn service(self) -> Service {
        match self {
            Operation::Kms(_) => Service::Kms,
            Operation::SecretManager(_) => Service::SecretManager,
        }
    }

    /// HTTP method used for the operation
    pub fn method(self) -> &'static str {
        use KmsOperation as K;
        use SecretManagerOperation as S;
        match self {
            Operation::Kms(K::ListKeys | K::GetKey)
            | Operation::SecretManager(S::ListVaults | S::GetVault | S::ListSecrets) => "GET",
            Operation::Kms(K::CreateKey)
            | Operation::SecretManager(S::CreateVault | S::PutSecret | S::UnveilSecret) => "POST",
            Operation::Kms(K::UpdateKey) | Operation::SecretManager(S::UpdateVault) => "PUT",
            Operation::Kms(K::DeleteKey)
            | Operation::SecretManager(S::DeleteVault | S::DeleteSecret) => "DELETE",
        }
    }

    /// Whether the path carries a `{id}` segment
    pub fn requires_id(self) -> bool {
        use KmsOperation as K;
        use SecretManagerOperation as S;
        !matches!(
            self,
            Operation::Kms(K::ListKeys | K::CreateKey)
                | Operation::SecretManager(S::ListVaults | S::CreateVault)
        )
    }

    /// Path template relative to the service prefix, with `{id}` placeholder
    pub(crate) fn template(self) -> &'static str {
        use KmsOperation as K;
        use SecretManagerOperation as S;
        match self {
            Operation::Kms(K::ListKeys | K::CreateKey) => "/keys",
            Operation::Kms(K::GetKey | K::UpdateKey | K::DeleteKey) => "/keys/{id}",
            Operation::SecretManager(S::ListVaults | S::CreateVault) => "/vaults",
            Operation::SecretManager(S::GetVault | S::UpdateVault | S::DeleteVault) => {
                "/vaults/{id}"
            }
            Operation::SecretManager(S::ListSecrets | S::PutSecret | S::DeleteSecret) => {
                "/vaults/{id}/secrets"
            }
            Operation::SecretManager(S::UnveilSecret) => "/vaults/{id}/secrets/unveil",
        }
    }
}
