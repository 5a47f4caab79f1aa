use attestr_core::{CredentialId, VerificationId};
use attestr_registry::RegistryError;
use thiserror::Error;

/// Failures of verification recording and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// The credential the caller asked to verify does not exist in the
    /// registry. Distinct from an existing-but-invalid credential, which
    /// records successfully with `is_valid = false`.
    #[error("credential not found: {0}")]
    CredentialNotFound(CredentialId),

    /// No verification record with this id.
    #[error("verification record not found: {0}")]
    NotFound(VerificationId),

    /// Access-control failure from the verifier's own role set.
    #[error(transparent)]
    Access(#[from] RegistryError),

    /// Role management called on a verifier constructed in open mode.
    #[error("verifier is not role-gated")]
    NotRoleGated,
}
