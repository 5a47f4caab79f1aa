use serde::{Deserialize, Serialize};

use attestr_core::{AccountId, CredentialId, Timestamp, VerificationId};

/// One verification event, frozen at recording time.
///
/// `is_valid` is the registry's answer at `verified_at` — a historical
/// fact, deliberately never refreshed. A record stays `is_valid: true`
/// even after the credential is later revoked or expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: VerificationId,
    pub credential_id: CredentialId,
    pub verifier: AccountId,
    pub verified_at: Timestamp,
    pub is_valid: bool,
}
