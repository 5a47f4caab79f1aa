//! # Credential Record
//!
//! The atomic record of the registry: who asserted what about whom, when,
//! and until when. All identity-defining fields are write-once; only the
//! revocation marker ever changes, and only false→true.

use serde::{Deserialize, Serialize};

use attestr_core::{AccountId, CredentialId, Timestamp};

/// A credential as stored by the registry.
///
/// Lives forever once issued — revocation flips `revoked`, nothing is
/// ever deleted. `metadata_uri` is an opaque pointer (e.g. `ar://…` or
/// `ipfs://…`) stored and returned verbatim; the registry never
/// dereferences or validates its scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier, derived at issuance. Immutable.
    pub id: CredentialId,
    /// The account that issued this credential. Immutable.
    pub issuer: AccountId,
    /// The account this credential is about. Immutable.
    pub subject: AccountId,
    /// Opaque pointer to off-chain credential content. Immutable.
    pub metadata_uri: String,
    /// When the credential was issued. Immutable.
    pub issued_at: Timestamp,
    /// When the credential expires; `None` means it never expires. Immutable.
    pub expires_at: Option<Timestamp>,
    /// Whether the credential has been revoked. Transitions false→true
    /// exactly once.
    pub revoked: bool,
    /// When the credential was revoked, if it has been.
    pub revoked_at: Option<Timestamp>,
}

impl Credential {
    /// Whether the credential's expiry has passed at time `at`.
    ///
    /// A credential expires at exactly `expires_at` — a query at that
    /// instant already sees it expired.
    pub fn is_expired_at(&self, at: Timestamp) -> bool {
        match self.expires_at {
            Some(expiry) => at >= expiry,
            None => false,
        }
    }

    /// Whether the credential is valid at time `at`: not revoked and not
    /// expired. A pure function of the record and the query time — the
    /// query mutates nothing.
    pub fn is_valid_at(&self, at: Timestamp) -> bool {
        !self.revoked && !self.is_expired_at(at)
    }
}

/// The result of a validity check, snapshotting the fields external
/// verifiers care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Whether the credential was valid at query time.
    pub is_valid: bool,
    /// The issuing account.
    pub issuer: AccountId,
    /// When the credential was issued.
    pub issued_at: Timestamp,
    /// The expiry, if any.
    pub expires_at: Option<Timestamp>,
    /// Whether the credential has been revoked.
    pub revoked: bool,
}

impl VerifyReport {
    /// Build a report for `credential` as observed at time `at`.
    pub fn at(credential: &Credential, at: Timestamp) -> Self {
        Self {
            is_valid: credential.is_valid_at(at),
            issuer: credential.issuer.clone(),
            issued_at: credential.issued_at,
            expires_at: credential.expires_at,
            revoked: credential.revoked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn make_credential(expires_at: Option<Timestamp>) -> Credential {
        let issuer = account("issuer-a");
        let subject = account("subject-b");
        let issued_at = ts("2026-01-01T00:00:00Z");
        Credential {
            id: CredentialId::derive(&issuer, &subject, 0, issued_at),
            issuer,
            subject,
            metadata_uri: "ar://abc123".to_string(),
            issued_at,
            expires_at,
            revoked: false,
            revoked_at: None,
        }
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let cred = make_credential(None);
        assert!(!cred.is_expired_at(ts("2099-12-31T23:59:59Z")));
        assert!(cred.is_valid_at(ts("2099-12-31T23:59:59Z")));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive_of_validity() {
        let expiry = ts("2026-06-01T00:00:00Z");
        let cred = make_credential(Some(expiry));
        // One second before expiry: valid.
        assert!(cred.is_valid_at(ts("2026-05-31T23:59:59Z")));
        // At expiry: invalid.
        assert!(!cred.is_valid_at(expiry));
        // After expiry: invalid.
        assert!(!cred.is_valid_at(ts("2026-06-01T00:00:01Z")));
    }

    #[test]
    fn test_revoked_is_invalid_regardless_of_expiry() {
        let mut cred = make_credential(None);
        cred.revoked = true;
        assert!(!cred.is_valid_at(ts("2026-01-02T00:00:00Z")));
    }

    #[test]
    fn test_verify_report_snapshots_fields() {
        let cred = make_credential(Some(ts("2026-06-01T00:00:00Z")));
        let report = VerifyReport::at(&cred, ts("2026-02-01T00:00:00Z"));
        assert!(report.is_valid);
        assert_eq!(report.issuer, cred.issuer);
        assert_eq!(report.issued_at, cred.issued_at);
        assert_eq!(report.expires_at, cred.expires_at);
        assert!(!report.revoked);
    }

    #[test]
    fn test_credential_serde_roundtrip() {
        let cred = make_credential(None);
        let json = serde_json::to_string(&cred).unwrap();
        let parsed: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, cred.id);
        assert_eq!(parsed.subject, cred.subject);
        assert_eq!(parsed.metadata_uri, cred.metadata_uri);
    }
}
