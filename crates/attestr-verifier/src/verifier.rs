//! # Verification Recorder
//!
//! Records who checked which credential, when, and what the registry
//! answered at that moment. Records are append-only facts; nothing ever
//! updates or deletes one.
//!
//! The verifier reads the registry but never writes to it, so it holds
//! the registry behind a shared [`Arc`] and takes its own lock only for
//! its own state. Event-log appends happen inside that same critical
//! section, so log order always matches mutation order.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use attestr_core::{AccountId, CredentialId, Timestamp, VerificationId};
use attestr_registry::{AccessControl, Page, Registry, RegistryError, Role};

use crate::error::VerifierError;
use crate::event::{VerifierEvent, VerifierLog};
use crate::record::VerificationRecord;

#[derive(Debug)]
struct VerifierState {
    records: HashMap<VerificationId, VerificationRecord>,
    by_verifier: attestr_registry::IdIndex<VerificationId>,
    /// `None` in open mode; `Some` carries the recorder role set.
    access: Option<AccessControl>,
    sequence: u64,
}

/// The verification recording service.
#[derive(Debug)]
pub struct Verifier {
    registry: Arc<Registry>,
    state: RwLock<VerifierState>,
    events: VerifierLog,
}

impl Verifier {
    /// Open-mode verifier: any account may record verifications.
    pub fn open(registry: Arc<Registry>) -> Self {
        Self::with_access(registry, None)
    }

    /// Role-gated verifier: only accounts granted the Verifier role by
    /// `admin` (via [`Verifier::grant_verifier`]) may record.
    pub fn role_gated(registry: Arc<Registry>, admin: AccountId) -> Self {
        Self::with_access(registry, Some(AccessControl::new(admin)))
    }

    fn with_access(registry: Arc<Registry>, access: Option<AccessControl>) -> Self {
        Self {
            registry,
            state: RwLock::new(VerifierState {
                records: HashMap::new(),
                by_verifier: attestr_registry::IdIndex::new(),
                access,
                sequence: 0,
            }),
            events: VerifierLog::new(),
        }
    }

    // ── Recording ────────────────────────────────────────────────────

    /// Record a verification of `credential_id` by `verifier`.
    ///
    /// The registry is consulted once; its answer (valid or not) is
    /// frozen into the record. An existing-but-invalid credential is a
    /// successful recording with `is_valid = false`.
    ///
    /// # Errors
    ///
    /// [`VerifierError::CredentialNotFound`] if the credential does not
    /// exist; [`VerifierError::Access`] if role-gated and `verifier`
    /// lacks the Verifier role.
    pub fn record(
        &self,
        verifier: &AccountId,
        credential_id: &CredentialId,
    ) -> Result<VerificationId, VerifierError> {
        let verified_at = Timestamp::now();
        let id = {
            let mut state = self.state.write();
            if let Some(access) = &state.access {
                access.ensure_role(verifier, Role::Verifier)?;
            }
            let is_valid = self.resolve(credential_id, verified_at)?;
            let id = Self::store_record(
                &mut state,
                verifier.clone(),
                *credential_id,
                is_valid,
                verified_at,
            );
            tracing::info!(%id, %verifier, %credential_id, is_valid, "verification recorded");
            self.events.append(VerifierEvent::VerificationRecorded {
                id,
                credential_id: *credential_id,
                verifier: verifier.clone(),
                is_valid,
                verified_at,
            });
            id
        };
        Ok(id)
    }

    /// Record verifications for every id in `credential_ids`, atomically.
    ///
    /// Every credential is resolved against the registry before any
    /// record is written; one unknown id fails the whole batch with no
    /// state change. Emits a single [`VerifierEvent::BatchRecorded`].
    pub fn batch_record(
        &self,
        verifier: &AccountId,
        credential_ids: &[CredentialId],
    ) -> Result<Vec<VerificationId>, VerifierError> {
        let verified_at = Timestamp::now();
        let ids = {
            let mut state = self.state.write();
            if let Some(access) = &state.access {
                access.ensure_role(verifier, Role::Verifier)?;
            }
            // Resolve the full batch first; only then write.
            let mut validities = Vec::with_capacity(credential_ids.len());
            for credential_id in credential_ids {
                validities.push(self.resolve(credential_id, verified_at)?);
            }
            let mut ids = Vec::with_capacity(credential_ids.len());
            for (credential_id, is_valid) in credential_ids.iter().zip(&validities) {
                ids.push(Self::store_record(
                    &mut state,
                    verifier.clone(),
                    *credential_id,
                    *is_valid,
                    verified_at,
                ));
            }
            tracing::info!(count = ids.len(), %verifier, "verification batch recorded");
            self.events.append(VerifierEvent::BatchRecorded {
                ids: ids.clone(),
                credential_ids: credential_ids.to_vec(),
                validities,
                verifier: verifier.clone(),
                verified_at,
            });
            ids
        };
        Ok(ids)
    }

    /// Registry validity snapshot, with its NotFound translated into the
    /// verifier's own vocabulary.
    fn resolve(
        &self,
        credential_id: &CredentialId,
        at: Timestamp,
    ) -> Result<bool, VerifierError> {
        match self.registry.verify_at(credential_id, at) {
            Ok(report) => Ok(report.is_valid),
            Err(RegistryError::NotFound(id)) => Err(VerifierError::CredentialNotFound(id)),
            Err(other) => Err(VerifierError::Access(other)),
        }
    }

    fn store_record(
        state: &mut VerifierState,
        verifier: AccountId,
        credential_id: CredentialId,
        is_valid: bool,
        verified_at: Timestamp,
    ) -> VerificationId {
        let sequence = state.sequence;
        state.sequence += 1;
        let id = VerificationId::derive(&verifier, &credential_id, sequence, verified_at);
        state.by_verifier.append(&verifier, id);
        state.records.insert(
            id,
            VerificationRecord {
                id,
                credential_id,
                verifier,
                verified_at,
                is_valid,
            },
        );
        id
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch a stored verification record.
    ///
    /// # Errors
    ///
    /// [`VerifierError::NotFound`] if the id is unknown.
    pub fn get(&self, id: &VerificationId) -> Result<VerificationRecord, VerifierError> {
        self.state
            .read()
            .records
            .get(id)
            .cloned()
            .ok_or(VerifierError::NotFound(*id))
    }

    /// A window of `verifier`'s recording history, oldest first.
    pub fn history(
        &self,
        verifier: &AccountId,
        offset: usize,
        limit: usize,
    ) -> Page<VerificationId> {
        self.state.read().by_verifier.page(verifier, offset, limit)
    }

    /// Total number of records ever written.
    pub fn record_count(&self) -> usize {
        self.state.read().records.len()
    }

    /// The verifier's own append-only event log.
    pub fn event_log(&self) -> &VerifierLog {
        &self.events
    }

    // ── Role management (role-gated mode only) ───────────────────────

    /// Grant the Verifier role to `account`.
    ///
    /// # Errors
    ///
    /// [`VerifierError::NotRoleGated`] in open mode;
    /// [`VerifierError::Access`] if `actor` is not this verifier's
    /// administrator.
    pub fn grant_verifier(
        &self,
        actor: &AccountId,
        account: AccountId,
    ) -> Result<(), VerifierError> {
        let mut state = self.state.write();
        let access = state.access.as_mut().ok_or(VerifierError::NotRoleGated)?;
        if access.grant_role(actor, Role::Verifier, account.clone())? {
            self.events.append(VerifierEvent::VerifierGranted {
                account,
                by: actor.clone(),
            });
        }
        Ok(())
    }

    /// Remove the Verifier role from `account`.
    pub fn revoke_verifier(
        &self,
        actor: &AccountId,
        account: &AccountId,
    ) -> Result<(), VerifierError> {
        let mut state = self.state.write();
        let access = state.access.as_mut().ok_or(VerifierError::NotRoleGated)?;
        if access.revoke_role(actor, Role::Verifier, account)? {
            self.events.append(VerifierEvent::VerifierRevoked {
                account: account.clone(),
                by: actor.clone(),
            });
        }
        Ok(())
    }

    /// Whether `account` may record. Always true in open mode.
    pub fn may_record(&self, account: &AccountId) -> bool {
        match &self.state.read().access {
            None => true,
            Some(access) => access.has_role(account, Role::Verifier),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn account(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    /// Registry with one issuer plus an open verifier over it.
    fn make_stack() -> (Arc<Registry>, Verifier, AccountId) {
        let admin = account("admin");
        let issuer = account("issuer-a");
        let registry = Registry::shared(admin.clone());
        registry
            .grant_role(&admin, Role::Issuer, issuer.clone())
            .unwrap();
        let verifier = Verifier::open(Arc::clone(&registry));
        (registry, verifier, issuer)
    }

    fn issue_one(registry: &Registry, issuer: &AccountId) -> CredentialId {
        registry
            .issue(
                issuer,
                account("subject-b"),
                "ar://metadata".to_string(),
                None,
            )
            .unwrap()
    }

    #[test]
    fn test_record_valid_credential() {
        let (registry, verifier, issuer) = make_stack();
        let auditor = account("auditor");
        let credential_id = issue_one(&registry, &issuer);

        let id = verifier.record(&auditor, &credential_id).unwrap();
        let record = verifier.get(&id).unwrap();
        assert_eq!(record.credential_id, credential_id);
        assert_eq!(record.verifier, auditor);
        assert!(record.is_valid);
    }

    #[test]
    fn test_record_revoked_credential_succeeds_as_invalid() {
        let (registry, verifier, issuer) = make_stack();
        let credential_id = issue_one(&registry, &issuer);
        registry.revoke(&issuer, &credential_id).unwrap();

        let id = verifier.record(&account("auditor"), &credential_id).unwrap();
        assert!(!verifier.get(&id).unwrap().is_valid);
    }

    #[test]
    fn test_record_unknown_credential_fails() {
        let (_registry, verifier, _) = make_stack();
        let ghost = CredentialId::from_bytes([0u8; 32]);
        assert!(matches!(
            verifier.record(&account("auditor"), &ghost),
            Err(VerifierError::CredentialNotFound(_))
        ));
        assert_eq!(verifier.record_count(), 0);
    }

    #[test]
    fn test_record_is_a_frozen_snapshot() {
        let (registry, verifier, issuer) = make_stack();
        let credential_id = issue_one(&registry, &issuer);
        let id = verifier.record(&account("auditor"), &credential_id).unwrap();
        assert!(verifier.get(&id).unwrap().is_valid);

        // Later revocation does not rewrite history.
        registry.revoke(&issuer, &credential_id).unwrap();
        assert!(verifier.get(&id).unwrap().is_valid);
    }

    #[test]
    fn test_batch_record_atomic_on_unknown_id() {
        let (registry, verifier, issuer) = make_stack();
        let known = issue_one(&registry, &issuer);
        let ghost = CredentialId::from_bytes([9u8; 32]);

        let result = verifier.batch_record(&account("auditor"), &[known, ghost]);
        assert!(matches!(result, Err(VerifierError::CredentialNotFound(_))));
        assert_eq!(verifier.record_count(), 0);
        assert!(verifier.event_log().is_empty());
        assert_eq!(verifier.history(&account("auditor"), 0, 10).total, 0);
    }

    #[test]
    fn test_batch_record_happy_path() {
        let (registry, verifier, issuer) = make_stack();
        let a = issue_one(&registry, &issuer);
        let b = issue_one(&registry, &issuer);
        registry.revoke(&issuer, &b).unwrap();
        let auditor = account("auditor");

        let ids = verifier.batch_record(&auditor, &[a, b]).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(verifier.get(&ids[0]).unwrap().is_valid);
        assert!(!verifier.get(&ids[1]).unwrap().is_valid);

        let history = verifier.history(&auditor, 0, 10);
        assert_eq!(history.items, ids);
        assert_eq!(history.total, 2);

        // The single batch event carries the full parallel arrays, so an
        // indexer can reconstruct the batch without querying back.
        let events = verifier.event_log().snapshot();
        let batch = events
            .iter()
            .find_map(|e| match e {
                VerifierEvent::BatchRecorded {
                    ids,
                    credential_ids,
                    validities,
                    ..
                } => Some((ids, credential_ids, validities)),
                _ => None,
            })
            .expect("batch event emitted");
        assert_eq!(batch.0, &ids);
        assert_eq!(batch.1, &vec![a, b]);
        assert_eq!(batch.2, &vec![true, false]);
    }

    #[test]
    fn test_history_pagination() {
        let (registry, verifier, issuer) = make_stack();
        let auditor = account("auditor");
        let mut recorded = Vec::new();
        for _ in 0..7 {
            let credential_id = issue_one(&registry, &issuer);
            recorded.push(verifier.record(&auditor, &credential_id).unwrap());
        }

        let first = verifier.history(&auditor, 0, 3);
        let second = verifier.history(&auditor, 3, 3);
        let third = verifier.history(&auditor, 6, 3);
        assert_eq!(first.items, recorded[0..3]);
        assert_eq!(second.items, recorded[3..6]);
        assert_eq!(third.items, recorded[6..]);
        assert_eq!(first.total, 7);
    }

    #[test]
    fn test_role_gated_mode_blocks_strangers() {
        let admin = account("admin");
        let issuer = account("issuer-a");
        let registry = Registry::shared(admin.clone());
        registry
            .grant_role(&admin, Role::Issuer, issuer.clone())
            .unwrap();
        let credential_id = issue_one(&registry, &issuer);
        let verifier = Verifier::role_gated(Arc::clone(&registry), admin.clone());

        let auditor = account("auditor");
        assert!(!verifier.may_record(&auditor));
        assert!(matches!(
            verifier.record(&auditor, &credential_id),
            Err(VerifierError::Access(RegistryError::Unauthorized { .. }))
        ));

        verifier.grant_verifier(&admin, auditor.clone()).unwrap();
        assert!(verifier.may_record(&auditor));
        assert!(verifier.record(&auditor, &credential_id).is_ok());

        verifier.revoke_verifier(&admin, &auditor).unwrap();
        assert!(!verifier.may_record(&auditor));
    }

    #[test]
    fn test_role_management_rejected_in_open_mode() {
        let (_registry, verifier, _) = make_stack();
        let admin = account("admin");
        assert!(matches!(
            verifier.grant_verifier(&admin, account("auditor")),
            Err(VerifierError::NotRoleGated)
        ));
    }

    #[test]
    fn test_verifier_roles_independent_of_registry_roles() {
        let admin = account("admin");
        let registry = Registry::shared(admin.clone());
        let verifier = Verifier::role_gated(Arc::clone(&registry), admin.clone());
        let auditor = account("auditor");
        verifier.grant_verifier(&admin, auditor.clone()).unwrap();
        // The registry's own role sets are untouched.
        assert!(!registry.has_role(&auditor, Role::Verifier));
    }

    #[test]
    fn test_log_order_matches_mutation_order_under_contention() {
        let admin = account("admin");
        let registry = Registry::shared(admin.clone());
        let verifier = Arc::new(Verifier::role_gated(Arc::clone(&registry), admin.clone()));

        let mut handles = Vec::new();
        for t in 0..4 {
            let admin = admin.clone();
            let auditor = account(&format!("auditor-{t}"));
            let verifier = Arc::clone(&verifier);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    verifier.grant_verifier(&admin, auditor.clone()).unwrap();
                    verifier.revoke_verifier(&admin, &auditor).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Per account the log must strictly alternate grant, revoke,
        // grant, ... or a replaying indexer would reconstruct the wrong
        // role set.
        let mut held: std::collections::HashSet<AccountId> = std::collections::HashSet::new();
        for event in verifier.event_log().snapshot() {
            match event {
                VerifierEvent::VerifierGranted { account, .. } => {
                    assert!(held.insert(account), "grant replayed while already granted");
                }
                VerifierEvent::VerifierRevoked { account, .. } => {
                    assert!(held.remove(&account), "revoke replayed while not granted");
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_get_unknown_record_not_found() {
        let (_registry, verifier, _) = make_stack();
        let ghost = VerificationId::from_bytes([3u8; 32]);
        assert!(matches!(
            verifier.get(&ghost),
            Err(VerifierError::NotFound(_))
        ));
    }
}
