//! # Registry Error Taxonomy
//!
//! Structured error types for registry operations, built with `thiserror`.
//! Every failed mutating call leaves registry state exactly as it was
//! before the call — these errors are always raised before any write.

use thiserror::Error;

use attestr_core::{AccountId, CredentialId};

use crate::access::Role;

/// Errors raised by registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller lacks the role required for the attempted operation.
    #[error("account {actor} lacks the {required} role")]
    Unauthorized {
        /// The account that attempted the operation.
        actor: AccountId,
        /// The role that would have permitted it.
        required: Role,
    },

    /// Referenced credential does not exist.
    #[error("credential {0} not found")]
    NotFound(CredentialId),

    /// Malformed input, rejected before any write.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The registry is paused; issuance and revocation are blocked until
    /// an administrator unpauses it.
    #[error("registry is paused")]
    Suspended,

    /// The emergency circuit breaker is engaged; all mutating calls are
    /// blocked except releasing the breaker itself.
    #[error("circuit breaker is engaged")]
    CircuitBroken,

    /// The credential is already revoked. Revocation is terminal and
    /// a second revocation is an error, not a no-op.
    #[error("credential {0} is already revoked")]
    AlreadyRevoked(CredentialId),
}
