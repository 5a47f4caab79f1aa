//! # Credential Registry
//!
//! The sole source of truth for credential existence, content, and
//! revocation status. Owns the issuer/subject indices, the role/flag
//! state, and the event log.
//!
//! ## Concurrency
//!
//! The source environment serializes every state-changing call at the
//! transaction level. This implementation reproduces that contract with
//! one exclusive writer lock over the whole registry state — credentials,
//! both indices, roles, and flags. Mutating operations (including whole
//! batches) run as a single critical section; reads take a shared lock
//! and see a consistent snapshot.
//!
//! Event-log appends happen inside the same critical section, so log
//! order always matches mutation order. Only the external sink fan-out
//! runs after the lock drops.
//!
//! ## Atomicity
//!
//! Every mutating operation validates completely before writing anything.
//! Batch issuance stages all credentials into a buffer and commits only
//! after the whole batch has validated — a failed batch leaves storage
//! and indices untouched.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use attestr_core::{AccountId, CredentialId, Timestamp};

use crate::access::{AccessControl, Role};
use crate::credential::{Credential, VerifyReport};
use crate::error::RegistryError;
use crate::event::{EventBus, EventLog, EventSink, RegistryEvent};
use crate::index::{IdIndex, Page};

#[derive(Debug)]
struct RegistryState {
    credentials: HashMap<CredentialId, Credential>,
    by_issuer: IdIndex<CredentialId>,
    by_subject: IdIndex<CredentialId>,
    access: AccessControl,
    /// Monotonic issuance counter feeding id derivation. Never reset.
    sequence: u64,
}

/// The credential registry service.
///
/// Cheap to share: wrap in an [`Arc`] and clone the handle.
#[derive(Debug)]
pub struct Registry {
    state: RwLock<RegistryState>,
    events: EventBus,
}

impl Registry {
    /// Create a registry with a single root administrator and both
    /// safety flags inactive.
    pub fn new(root_admin: AccountId) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                credentials: HashMap::new(),
                by_issuer: IdIndex::new(),
                by_subject: IdIndex::new(),
                access: AccessControl::new(root_admin),
                sequence: 0,
            }),
            events: EventBus::new(),
        }
    }

    /// Convenience constructor returning an [`Arc`]-wrapped registry.
    pub fn shared(root_admin: AccountId) -> Arc<Self> {
        Arc::new(Self::new(root_admin))
    }

    // ── Issuance ─────────────────────────────────────────────────────

    /// Issue a credential about `subject`.
    ///
    /// Requires that `issuer` holds the Issuer role and that neither the
    /// pause flag nor the circuit breaker is active. The returned id is
    /// an opaque token; callers must not parse or predict it.
    ///
    /// # Errors
    ///
    /// [`RegistryError::CircuitBroken`], [`RegistryError::Suspended`],
    /// or [`RegistryError::Unauthorized`] — in that order of precedence,
    /// with no state change.
    pub fn issue(
        &self,
        issuer: &AccountId,
        subject: AccountId,
        metadata_uri: String,
        expires_at: Option<Timestamp>,
    ) -> Result<CredentialId, RegistryError> {
        let issued_at = Timestamp::now();
        let (id, event) = {
            let mut state = self.state.write();
            state.access.ensure_operational()?;
            state.access.ensure_role(issuer, Role::Issuer)?;

            let id = Self::store_credential(
                &mut state,
                issuer.clone(),
                subject.clone(),
                metadata_uri,
                expires_at,
                issued_at,
            );
            tracing::info!(%id, %issuer, %subject, "credential issued");
            let event = RegistryEvent::Issued {
                id,
                issuer: issuer.clone(),
                subject,
                issued_at,
            };
            self.events.record(&event);
            (id, event)
        };
        self.events.fan_out(&event);
        Ok(id)
    }

    /// Issue one credential per entry of the parallel input arrays,
    /// atomically: either the whole batch persists or nothing does.
    ///
    /// Returns the allocated ids in input order and emits a single
    /// [`RegistryEvent::BatchIssued`] carrying the full batch.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidArgument`] if the arrays differ in length
    /// (checked before any write), plus the same gating errors as
    /// [`Registry::issue`].
    pub fn batch_issue(
        &self,
        issuer: &AccountId,
        subjects: &[AccountId],
        metadata_uris: &[String],
        expiries: &[Option<Timestamp>],
    ) -> Result<Vec<CredentialId>, RegistryError> {
        if subjects.len() != metadata_uris.len() || subjects.len() != expiries.len() {
            return Err(RegistryError::InvalidArgument(format!(
                "batch arrays differ in length: {} subjects, {} metadata uris, {} expiries",
                subjects.len(),
                metadata_uris.len(),
                expiries.len()
            )));
        }

        let issued_at = Timestamp::now();
        let (ids, event) = {
            let mut state = self.state.write();
            state.access.ensure_operational()?;
            state.access.ensure_role(issuer, Role::Issuer)?;

            // All entries validated; commit the whole batch under the
            // same write guard.
            let mut ids = Vec::with_capacity(subjects.len());
            for ((subject, uri), expiry) in subjects.iter().zip(metadata_uris).zip(expiries) {
                let id = Self::store_credential(
                    &mut state,
                    issuer.clone(),
                    subject.clone(),
                    uri.clone(),
                    *expiry,
                    issued_at,
                );
                ids.push(id);
            }
            tracing::info!(count = ids.len(), %issuer, "credential batch issued");
            let event = RegistryEvent::BatchIssued {
                ids: ids.clone(),
                issuer: issuer.clone(),
                subjects: subjects.to_vec(),
                issued_at,
            };
            self.events.record(&event);
            (ids, event)
        };
        self.events.fan_out(&event);
        Ok(ids)
    }

    /// Allocate an id, persist the credential, and update both indices.
    /// Callers hold the write lock and have already passed the gates.
    fn store_credential(
        state: &mut RegistryState,
        issuer: AccountId,
        subject: AccountId,
        metadata_uri: String,
        expires_at: Option<Timestamp>,
        issued_at: Timestamp,
    ) -> CredentialId {
        let sequence = state.sequence;
        state.sequence += 1;

        let id = CredentialId::derive(&issuer, &subject, sequence, issued_at);
        state.by_issuer.append(&issuer, id);
        state.by_subject.append(&subject, id);
        state.credentials.insert(
            id,
            Credential {
                id,
                issuer,
                subject,
                metadata_uri,
                issued_at,
                expires_at,
                revoked: false,
                revoked_at: None,
            },
        );
        id
    }

    // ── Revocation ───────────────────────────────────────────────────

    /// Revoke a credential. Terminal: a revoked credential never becomes
    /// valid again, and revoking it a second time is an error.
    ///
    /// Authorized for the credential's original issuer, any
    /// administrator, or any holder of the Revoker role.
    ///
    /// # Errors
    ///
    /// Gating errors as for issuance; [`RegistryError::NotFound`] for an
    /// unknown id; [`RegistryError::Unauthorized`] for other callers;
    /// [`RegistryError::AlreadyRevoked`] on re-revocation.
    pub fn revoke(&self, actor: &AccountId, id: &CredentialId) -> Result<(), RegistryError> {
        let revoked_at = Timestamp::now();
        let event = {
            let mut state = self.state.write();
            state.access.ensure_operational()?;

            let authorized = state.access.has_role(actor, Role::Administrator)
                || state.access.has_role(actor, Role::Revoker)
                || state
                    .credentials
                    .get(id)
                    .is_some_and(|c| c.issuer == *actor);

            let credential = state
                .credentials
                .get_mut(id)
                .ok_or(RegistryError::NotFound(*id))?;
            if !authorized {
                return Err(RegistryError::Unauthorized {
                    actor: actor.clone(),
                    required: Role::Revoker,
                });
            }
            if credential.revoked {
                return Err(RegistryError::AlreadyRevoked(*id));
            }
            credential.revoked = true;
            credential.revoked_at = Some(revoked_at);
            tracing::info!(%id, %actor, "credential revoked");
            let event = RegistryEvent::Revoked {
                id: *id,
                issuer: credential.issuer.clone(),
                revoked_at,
            };
            self.events.record(&event);
            event
        };
        self.events.fan_out(&event);
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the full stored record for a credential.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if the id is unknown.
    pub fn get(&self, id: &CredentialId) -> Result<Credential, RegistryError> {
        self.state
            .read()
            .credentials
            .get(id)
            .cloned()
            .ok_or(RegistryError::NotFound(*id))
    }

    /// Check a credential's validity as of now. Pure read — no side
    /// effects, no authorization required.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if the id is unknown.
    pub fn verify(&self, id: &CredentialId) -> Result<VerifyReport, RegistryError> {
        self.verify_at(id, Timestamp::now())
    }

    /// Check a credential's validity as observed at time `at`.
    ///
    /// Validity is a pure function of the stored record and the query
    /// time: exists, not revoked, and not expired.
    pub fn verify_at(
        &self,
        id: &CredentialId,
        at: Timestamp,
    ) -> Result<VerifyReport, RegistryError> {
        let state = self.state.read();
        let credential = state
            .credentials
            .get(id)
            .ok_or(RegistryError::NotFound(*id))?;
        Ok(VerifyReport::at(credential, at))
    }

    /// Validity of each id, order-preserving and the same length as the
    /// input. Unknown ids yield `false` rather than failing the call.
    pub fn batch_verify(&self, ids: &[CredentialId]) -> Vec<bool> {
        self.batch_verify_at(ids, Timestamp::now())
    }

    /// [`Registry::batch_verify`] at an explicit query time.
    pub fn batch_verify_at(&self, ids: &[CredentialId], at: Timestamp) -> Vec<bool> {
        let state = self.state.read();
        ids.iter()
            .map(|id| {
                state
                    .credentials
                    .get(id)
                    .is_some_and(|c| c.is_valid_at(at))
            })
            .collect()
    }

    /// A window of the subject's credential index: at most `limit` ids
    /// starting at `offset`, in issuance order, plus the total count.
    pub fn credentials_for_subject(
        &self,
        subject: &AccountId,
        offset: usize,
        limit: usize,
    ) -> Page<CredentialId> {
        self.state.read().by_subject.page(subject, offset, limit)
    }

    /// The issuer-side counterpart of [`Registry::credentials_for_subject`].
    pub fn credentials_for_issuer(
        &self,
        issuer: &AccountId,
        offset: usize,
        limit: usize,
    ) -> Page<CredentialId> {
        self.state.read().by_issuer.page(issuer, offset, limit)
    }

    // ── Administration ───────────────────────────────────────────────

    /// Grant `role` to `account`. Administrator-gated, idempotent.
    pub fn grant_role(
        &self,
        actor: &AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<(), RegistryError> {
        let event = {
            let mut state = self.state.write();
            let changed = state.access.grant_role(actor, role, account.clone())?;
            changed.then(|| {
                let event = RegistryEvent::RoleGranted {
                    role,
                    account,
                    by: actor.clone(),
                };
                self.events.record(&event);
                event
            })
        };
        if let Some(event) = event {
            self.events.fan_out(&event);
        }
        Ok(())
    }

    /// Remove `role` from `account`. Administrator-gated, idempotent.
    pub fn revoke_role(
        &self,
        actor: &AccountId,
        role: Role,
        account: &AccountId,
    ) -> Result<(), RegistryError> {
        let event = {
            let mut state = self.state.write();
            let changed = state.access.revoke_role(actor, role, account)?;
            changed.then(|| {
                let event = RegistryEvent::RoleRevoked {
                    role,
                    account: account.clone(),
                    by: actor.clone(),
                };
                self.events.record(&event);
                event
            })
        };
        if let Some(event) = event {
            self.events.fan_out(&event);
        }
        Ok(())
    }

    /// Set the pause flag. Administrator-gated, idempotent.
    pub fn set_paused(&self, actor: &AccountId, paused: bool) -> Result<(), RegistryError> {
        let event = {
            let mut state = self.state.write();
            let changed = state.access.set_paused(actor, paused)?;
            changed.then(|| {
                tracing::warn!(paused, %actor, "registry pause flag changed");
                let event = RegistryEvent::PausedSet {
                    paused,
                    by: actor.clone(),
                };
                self.events.record(&event);
                event
            })
        };
        if let Some(event) = event {
            self.events.fan_out(&event);
        }
        Ok(())
    }

    /// Engage or release the emergency circuit breaker. While engaged,
    /// releasing it is the only reachable mutation.
    pub fn set_circuit_breaker(
        &self,
        actor: &AccountId,
        engaged: bool,
    ) -> Result<(), RegistryError> {
        let event = {
            let mut state = self.state.write();
            let changed = state.access.set_circuit_breaker(actor, engaged)?;
            changed.then(|| {
                tracing::warn!(engaged, %actor, "circuit breaker changed");
                let event = RegistryEvent::CircuitBreakerSet {
                    engaged,
                    by: actor.clone(),
                };
                self.events.record(&event);
                event
            })
        };
        if let Some(event) = event {
            self.events.fan_out(&event);
        }
        Ok(())
    }

    /// Transfer administrator ownership from `actor` to `new_admin`.
    pub fn transfer_admin(
        &self,
        actor: &AccountId,
        new_admin: AccountId,
    ) -> Result<(), RegistryError> {
        let event = {
            let mut state = self.state.write();
            state.access.transfer_admin(actor, new_admin.clone())?;
            (*actor != new_admin).then(|| {
                let event = RegistryEvent::AdminTransferred {
                    from: actor.clone(),
                    to: new_admin,
                };
                self.events.record(&event);
                event
            })
        };
        if let Some(event) = event {
            self.events.fan_out(&event);
        }
        Ok(())
    }

    /// Whether `account` currently holds `role`.
    pub fn has_role(&self, account: &AccountId, role: Role) -> bool {
        self.state.read().access.has_role(account, role)
    }

    /// Whether the registry is paused.
    pub fn is_paused(&self) -> bool {
        self.state.read().access.is_paused()
    }

    /// Whether the circuit breaker is engaged.
    pub fn is_circuit_broken(&self) -> bool {
        self.state.read().access.is_circuit_broken()
    }

    // ── Events ───────────────────────────────────────────────────────

    /// The built-in append-only event log.
    pub fn event_log(&self) -> &EventLog {
        self.events.log()
    }

    /// Register an external sink invoked after each successful mutation.
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.events.subscribe(sink);
    }

    /// Total number of credentials ever issued.
    pub fn credential_count(&self) -> usize {
        self.state.read().credentials.len()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn account(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    /// Registry with admin "admin" and issuer "issuer-a".
    fn make_registry() -> (Registry, AccountId, AccountId) {
        let admin = account("admin");
        let issuer = account("issuer-a");
        let registry = Registry::new(admin.clone());
        registry
            .grant_role(&admin, Role::Issuer, issuer.clone())
            .unwrap();
        (registry, admin, issuer)
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

    // ── Issuance ─────────────────────────────────────────────────────

    #[test]
    fn test_issue_and_verify_valid() {
        let (registry, _, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);

        let report = registry.verify(&id).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.issuer, issuer);
        assert!(!report.revoked);
        assert_eq!(report.expires_at, None);
    }

    #[test]
    fn test_issue_requires_issuer_role() {
        let (registry, _, _) = make_registry();
        let mallory = account("mallory");
        let result = registry.issue(
            &mallory,
            account("subject-b"),
            "ar://metadata".to_string(),
            None,
        );
        assert!(matches!(
            result,
            Err(RegistryError::Unauthorized { required: Role::Issuer, .. })
        ));
        assert_eq!(registry.credential_count(), 0);
        assert!(registry.event_log().is_empty());
    }

    #[test]
    fn test_issue_updates_both_indices() {
        let (registry, _, issuer) = make_registry();
        let subject = account("subject-b");
        let id = registry
            .issue(&issuer, subject.clone(), "ar://x".to_string(), None)
            .unwrap();

        let by_subject = registry.credentials_for_subject(&subject, 0, 10);
        assert_eq!(by_subject.items, vec![id]);
        assert_eq!(by_subject.total, 1);
        let by_issuer = registry.credentials_for_issuer(&issuer, 0, 10);
        assert_eq!(by_issuer.items, vec![id]);
        assert_eq!(by_issuer.total, 1);
    }

    #[test]
    fn test_issued_ids_are_unique() {
        let (registry, _, issuer) = make_registry();
        let a = issue_one(&registry, &issuer);
        let b = issue_one(&registry, &issuer);
        assert_ne!(a, b);
    }

    #[test]
    fn test_issue_emits_event() {
        let (registry, _, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);
        let events = registry.event_log().snapshot();
        assert!(events.iter().any(|e| matches!(
            e,
            RegistryEvent::Issued { id: eid, .. } if *eid == id
        )));
    }

    #[test]
    fn test_metadata_stored_verbatim() {
        let (registry, _, issuer) = make_registry();
        let uri = "not a uri at all, just bytes ~~".to_string();
        let id = registry
            .issue(&issuer, account("subject-b"), uri.clone(), None)
            .unwrap();
        assert_eq!(registry.get(&id).unwrap().metadata_uri, uri);
    }

    // ── Batch issuance ───────────────────────────────────────────────

    #[test]
    fn test_batch_issue_happy_path() {
        let (registry, _, issuer) = make_registry();
        let subjects = vec![account("b"), account("c"), account("b")];
        let uris = vec!["ar://1".into(), "ar://2".into(), "ar://3".into()];
        let expiries = vec![None, None, None];

        let ids = registry
            .batch_issue(&issuer, &subjects, &uris, &expiries)
            .unwrap();
        assert_eq!(ids.len(), 3);

        // Subject b got two credentials, c got one.
        let page_b = registry.credentials_for_subject(&account("b"), 0, 10);
        assert_eq!(page_b.total, 2);
        assert_eq!(page_b.items, vec![ids[0], ids[2]]);
        let page_c = registry.credentials_for_subject(&account("c"), 0, 10);
        assert_eq!(page_c.total, 1);

        // Single batch event carrying parallel arrays.
        let events = registry.event_log().snapshot();
        let batch = events
            .iter()
            .find_map(|e| match e {
                RegistryEvent::BatchIssued { ids, subjects, .. } => Some((ids, subjects)),
                _ => None,
            })
            .expect("batch event emitted");
        assert_eq!(batch.0, &ids);
        assert_eq!(batch.1, &subjects);
    }

    #[test]
    fn test_batch_issue_length_mismatch_is_atomic_failure() {
        let (registry, _, issuer) = make_registry();
        let subjects = vec![account("b"), account("c")];
        let uris = vec!["ar://1".to_string()];
        let expiries = vec![None, None];

        let result = registry.batch_issue(&issuer, &subjects, &uris, &expiries);
        assert!(matches!(result, Err(RegistryError::InvalidArgument(_))));

        // No partial writes anywhere.
        assert_eq!(registry.credential_count(), 0);
        assert_eq!(registry.credentials_for_subject(&account("b"), 0, 10).total, 0);
        assert_eq!(registry.credentials_for_issuer(&issuer, 0, 10).total, 0);
        assert!(registry.event_log().is_empty());
    }

    #[test]
    fn test_batch_issue_empty_is_ok() {
        let (registry, _, issuer) = make_registry();
        let ids = registry.batch_issue(&issuer, &[], &[], &[]).unwrap();
        assert!(ids.is_empty());
    }

    // ── Revocation ───────────────────────────────────────────────────

    #[test]
    fn test_issuer_can_revoke_own_credential() {
        let (registry, _, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);
        registry.revoke(&issuer, &id).unwrap();

        let report = registry.verify(&id).unwrap();
        assert!(!report.is_valid);
        assert!(report.revoked);
    }

    #[test]
    fn test_admin_can_revoke_any_credential() {
        let (registry, admin, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);
        registry.revoke(&admin, &id).unwrap();
        assert!(registry.get(&id).unwrap().revoked);
    }

    #[test]
    fn test_revoker_role_can_revoke() {
        let (registry, admin, issuer) = make_registry();
        let auditor = account("auditor");
        registry
            .grant_role(&admin, Role::Revoker, auditor.clone())
            .unwrap();
        let id = issue_one(&registry, &issuer);
        registry.revoke(&auditor, &id).unwrap();
        assert!(registry.get(&id).unwrap().revoked);
    }

    #[test]
    fn test_unprivileged_cannot_revoke() {
        let (registry, _, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);
        let mallory = account("mallory");
        assert!(matches!(
            registry.revoke(&mallory, &id),
            Err(RegistryError::Unauthorized { .. })
        ));
        assert!(!registry.get(&id).unwrap().revoked);
    }

    #[test]
    fn test_revoke_unknown_id_not_found() {
        let (registry, admin, _) = make_registry();
        let ghost = CredentialId::from_bytes([0u8; 32]);
        assert!(matches!(
            registry.revoke(&admin, &ghost),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_re_revocation_is_an_error() {
        let (registry, _, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);
        registry.revoke(&issuer, &id).unwrap();
        assert!(matches!(
            registry.revoke(&issuer, &id),
            Err(RegistryError::AlreadyRevoked(_))
        ));
        // Still revoked, and still exactly one revocation event.
        assert!(registry.get(&id).unwrap().revoked);
        let revocations = registry
            .event_log()
            .snapshot()
            .iter()
            .filter(|e| matches!(e, RegistryEvent::Revoked { .. }))
            .count();
        assert_eq!(revocations, 1);
    }

    #[test]
    fn test_revocation_does_not_remove_from_indices() {
        let (registry, _, issuer) = make_registry();
        let subject = account("subject-b");
        let id = registry
            .issue(&issuer, subject.clone(), "ar://x".to_string(), None)
            .unwrap();
        registry.revoke(&issuer, &id).unwrap();
        let page = registry.credentials_for_subject(&subject, 0, 10);
        assert_eq!(page.items, vec![id]);
        assert_eq!(page.total, 1);
    }

    // ── Write-once identity (P1) ─────────────────────────────────────

    #[test]
    fn test_identity_fields_unchanged_by_revocation() {
        let (registry, _, issuer) = make_registry();
        let expiry = ts("2099-01-01T00:00:00Z");
        let id = registry
            .issue(
                &issuer,
                account("subject-b"),
                "ar://frozen".to_string(),
                Some(expiry),
            )
            .unwrap();

        let before = registry.get(&id).unwrap();
        registry.revoke(&issuer, &id).unwrap();
        let after = registry.get(&id).unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.issuer, before.issuer);
        assert_eq!(after.subject, before.subject);
        assert_eq!(after.metadata_uri, before.metadata_uri);
        assert_eq!(after.issued_at, before.issued_at);
        assert_eq!(after.expires_at, before.expires_at);
        assert!(after.revoked && !before.revoked);
    }

    // ── Expiry purity (P3) ───────────────────────────────────────────

    #[test]
    fn test_expiry_is_time_dependent_view_not_mutation() {
        let (registry, _, issuer) = make_registry();
        let expiry = ts("2026-06-01T00:00:00Z");
        let id = registry
            .issue(
                &issuer,
                account("subject-b"),
                "ar://x".to_string(),
                Some(expiry),
            )
            .unwrap();

        assert!(registry.verify_at(&id, ts("2026-05-31T23:59:59Z")).unwrap().is_valid);
        assert!(!registry.verify_at(&id, expiry).unwrap().is_valid);
        assert!(!registry.verify_at(&id, ts("2027-01-01T00:00:00Z")).unwrap().is_valid);
        // Querying in the "expired" future did not mutate the record:
        // a query before expiry still sees it valid.
        assert!(registry.verify_at(&id, ts("2026-01-01T00:00:00Z")).unwrap().is_valid);
    }

    // ── Batch verification ───────────────────────────────────────────

    #[test]
    fn test_batch_verify_tolerates_unknown_ids() {
        let (registry, _, issuer) = make_registry();
        let known = issue_one(&registry, &issuer);
        let unknown = CredentialId::from_bytes([9u8; 32]);

        let results = registry.batch_verify(&[unknown, known, unknown]);
        assert_eq!(results, vec![false, true, false]);
    }

    #[test]
    fn test_batch_verify_mixed_statuses() {
        let (registry, _, issuer) = make_registry();
        let valid = issue_one(&registry, &issuer);
        let revoked = issue_one(&registry, &issuer);
        registry.revoke(&issuer, &revoked).unwrap();
        let expired = registry
            .issue(
                &issuer,
                account("subject-b"),
                "ar://x".to_string(),
                Some(ts("2026-01-01T00:00:00Z")),
            )
            .unwrap();

        let at = ts("2026-02-01T00:00:00Z");
        let results = registry.batch_verify_at(&[valid, revoked, expired], at);
        assert_eq!(results, vec![true, false, false]);
    }

    // ── Pause / circuit breaker gating (P7) ──────────────────────────

    #[test]
    fn test_pause_blocks_issue_and_revoke_until_unpaused() {
        let (registry, admin, issuer) = make_registry();
        let id = issue_one(&registry, &issuer);

        registry.set_paused(&admin, true).unwrap();
        assert!(matches!(
            registry.issue(&issuer, account("subject-b"), "ar://x".into(), None),
            Err(RegistryError::Suspended)
        ));
        assert!(matches!(
            registry.revoke(&issuer, &id),
            Err(RegistryError::Suspended)
        ));
        // Reads stay available while paused.
        assert!(registry.verify(&id).unwrap().is_valid);

        registry.set_paused(&admin, false).unwrap();
        assert!(registry
            .issue(&issuer, account("subject-b"), "ar://x".into(), None)
            .is_ok());
    }

    #[test]
    fn test_circuit_breaker_blocks_admin_ops_except_release() {
        let (registry, admin, issuer) = make_registry();
        registry.set_circuit_breaker(&admin, true).unwrap();

        assert!(matches!(
            registry.issue(&issuer, account("subject-b"), "ar://x".into(), None),
            Err(RegistryError::CircuitBroken)
        ));
        assert!(matches!(
            registry.grant_role(&admin, Role::Issuer, account("new-issuer")),
            Err(RegistryError::CircuitBroken)
        ));
        assert!(matches!(
            registry.set_paused(&admin, true),
            Err(RegistryError::CircuitBroken)
        ));

        registry.set_circuit_breaker(&admin, false).unwrap();
        assert!(registry
            .issue(&issuer, account("subject-b"), "ar://x".into(), None)
            .is_ok());
    }

    // ── Pagination (P5 shape) ────────────────────────────────────────

    #[test]
    fn test_pagination_windows_cover_index_exactly() {
        let (registry, _, issuer) = make_registry();
        let subject = account("subject-b");
        let mut issued = Vec::new();
        for i in 0..23 {
            issued.push(
                registry
                    .issue(&issuer, subject.clone(), format!("ar://{i}"), None)
                    .unwrap(),
            );
        }

        let mut collected = Vec::new();
        let mut offset = 0;
        loop {
            let page = registry.credentials_for_subject(&subject, offset, 5);
            assert_eq!(page.total, 23);
            if page.items.is_empty() {
                break;
            }
            offset += page.items.len();
            collected.extend(page.items);
        }
        assert_eq!(collected, issued);
    }

    #[test]
    fn test_pagination_offset_past_end() {
        let (registry, _, issuer) = make_registry();
        let subject = account("subject-b");
        for _ in 0..2 {
            registry
                .issue(&issuer, subject.clone(), "ar://x".to_string(), None)
                .unwrap();
        }
        let page = registry.credentials_for_subject(&subject, 100, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }

    // ── Admin surface ────────────────────────────────────────────────

    #[test]
    fn test_transfer_admin_hands_over_control() {
        let (registry, admin, _) = make_registry();
        let successor = account("successor");
        registry.transfer_admin(&admin, successor.clone()).unwrap();
        assert!(registry.has_role(&successor, Role::Administrator));
        assert!(!registry.has_role(&admin, Role::Administrator));
        assert!(registry.set_paused(&successor, true).is_ok());
        assert!(registry.set_paused(&admin, false).is_err());
    }

    // ── Event ordering ───────────────────────────────────────────────

    #[test]
    fn test_log_order_matches_mutation_order_under_contention() {
        let admin = account("admin");
        let registry = Registry::shared(admin.clone());
        let mut handles = Vec::new();
        for t in 0..4 {
            let issuer = account(&format!("issuer-{t}"));
            registry
                .grant_role(&admin, Role::Issuer, issuer.clone())
                .unwrap();
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    let id = registry
                        .issue(&issuer, account("subject-b"), "ar://x".to_string(), None)
                        .unwrap();
                    registry.revoke(&issuer, &id).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Replaying the log must never show a revocation before the
        // issuance of the same credential.
        let mut issued = std::collections::HashSet::new();
        for event in registry.event_log().snapshot() {
            match event {
                RegistryEvent::Issued { id, .. } => {
                    issued.insert(id);
                }
                RegistryEvent::Revoked { id, .. } => {
                    assert!(issued.contains(&id), "revocation replayed before issuance");
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_idempotent_admin_ops_emit_no_duplicate_events() {
        let (registry, admin, _) = make_registry();
        let baseline = registry.event_log().len();
        registry.set_paused(&admin, false).unwrap(); // already false
        registry
            .grant_role(&admin, Role::Issuer, account("issuer-a"))
            .unwrap(); // already granted
        assert_eq!(registry.event_log().len(), baseline);
    }
}
