//! Verifier-side domain events, mirroring the registry's log for
//! off-process indexers.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use attestr_core::{AccountId, CredentialId, Timestamp, VerificationId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerifierEvent {
    VerificationRecorded {
        id: VerificationId,
        credential_id: CredentialId,
        verifier: AccountId,
        is_valid: bool,
        verified_at: Timestamp,
    },
    /// `ids`, `credential_ids`, and `validities` are parallel arrays, so
    /// the full batch can be reconstructed from this one event.
    BatchRecorded {
        ids: Vec<VerificationId>,
        credential_ids: Vec<CredentialId>,
        validities: Vec<bool>,
        verifier: AccountId,
        verified_at: Timestamp,
    },
    VerifierGranted {
        account: AccountId,
        by: AccountId,
    },
    VerifierRevoked {
        account: AccountId,
        by: AccountId,
    },
}

/// Append-only in-process event log.
#[derive(Debug, Default)]
pub struct VerifierLog {
    entries: Mutex<Vec<VerifierEvent>>,
}

impl VerifierLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, event: VerifierEvent) {
        self.entries.lock().push(event);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Everything at or after `offset`, for incremental consumers.
    pub fn events_from(&self, offset: usize) -> Vec<VerifierEvent> {
        let entries = self.entries.lock();
        entries.iter().skip(offset).cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<VerifierEvent> {
        self.entries.lock().clone()
    }
}
