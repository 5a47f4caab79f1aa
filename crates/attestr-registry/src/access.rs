//! # Access Control — Roles and Safety Switches
//!
//! Role sets and the two global safety flags for a registry instance.
//! This is an explicit configuration object owned by the service that
//! uses it, mutated only through administrator-gated methods — never
//! ambient global state.
//!
//! ## Roles
//!
//! - **Administrator** — manages role membership and the safety flags.
//! - **Issuer** — may create credentials.
//! - **Revoker** — may revoke credentials it did not issue.
//! - **Verifier** — may record verifications when the verifier service
//!   is configured as role-gated.
//!
//! ## Safety switches
//!
//! - `paused` — blocks issuance and revocation; administrative calls
//!   (including unpausing) remain available.
//! - `circuit_broken` — emergency stop: blocks every mutating call,
//!   administrative ones included, except releasing the breaker itself.
//!
//! Both default to inactive. All administrative mutations are idempotent:
//! granting a role an account already holds, or setting a flag to its
//! current value, is a no-op success.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use attestr_core::AccountId;

use crate::error::RegistryError;

/// The roles recognized by the access-control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages role membership, pause, and the circuit breaker.
    Administrator,
    /// May create credentials.
    Issuer,
    /// May revoke credentials issued by others.
    Revoker,
    /// May record verifications on a role-gated verifier.
    Verifier,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::Issuer => "ISSUER",
            Self::Revoker => "REVOKER",
            Self::Verifier => "VERIFIER",
        };
        f.write_str(s)
    }
}

/// Role membership and safety-flag state.
///
/// The registry and the verifier each own an independent instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    administrators: HashSet<AccountId>,
    issuers: HashSet<AccountId>,
    revokers: HashSet<AccountId>,
    verifiers: HashSet<AccountId>,
    paused: bool,
    circuit_broken: bool,
}

impl AccessControl {
    /// Create an access-control state with a single root administrator
    /// and both safety flags inactive.
    pub fn new(root_admin: AccountId) -> Self {
        let mut administrators = HashSet::new();
        administrators.insert(root_admin);
        Self {
            administrators,
            issuers: HashSet::new(),
            revokers: HashSet::new(),
            verifiers: HashSet::new(),
            paused: false,
            circuit_broken: false,
        }
    }

    fn set_for(&self, role: Role) -> &HashSet<AccountId> {
        match role {
            Role::Administrator => &self.administrators,
            Role::Issuer => &self.issuers,
            Role::Revoker => &self.revokers,
            Role::Verifier => &self.verifiers,
        }
    }

    fn set_for_mut(&mut self, role: Role) -> &mut HashSet<AccountId> {
        match role {
            Role::Administrator => &mut self.administrators,
            Role::Issuer => &mut self.issuers,
            Role::Revoker => &mut self.revokers,
            Role::Verifier => &mut self.verifiers,
        }
    }

    /// Whether `account` holds `role`.
    pub fn has_role(&self, account: &AccountId, role: Role) -> bool {
        self.set_for(role).contains(account)
    }

    /// Whether the registry is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the circuit breaker is engaged.
    pub fn is_circuit_broken(&self) -> bool {
        self.circuit_broken
    }

    // ── Guards ───────────────────────────────────────────────────────

    /// Require that `actor` holds `role`.
    pub fn ensure_role(&self, actor: &AccountId, role: Role) -> Result<(), RegistryError> {
        if self.has_role(actor, role) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                actor: actor.clone(),
                required: role,
            })
        }
    }

    /// Require that domain mutations (issuance, revocation, verification
    /// recording) are currently permitted. Circuit breaker takes
    /// precedence over pause.
    pub fn ensure_operational(&self) -> Result<(), RegistryError> {
        if self.circuit_broken {
            return Err(RegistryError::CircuitBroken);
        }
        if self.paused {
            return Err(RegistryError::Suspended);
        }
        Ok(())
    }

    /// Require that administrative mutations are currently permitted.
    /// Pause does not block these; the circuit breaker does.
    fn ensure_admin_operational(&self) -> Result<(), RegistryError> {
        if self.circuit_broken {
            return Err(RegistryError::CircuitBroken);
        }
        Ok(())
    }

    // ── Administrator-gated mutations ────────────────────────────────

    /// Grant `role` to `account`. Idempotent.
    ///
    /// Returns whether membership actually changed.
    pub fn grant_role(
        &mut self,
        actor: &AccountId,
        role: Role,
        account: AccountId,
    ) -> Result<bool, RegistryError> {
        self.ensure_role(actor, Role::Administrator)?;
        self.ensure_admin_operational()?;
        Ok(self.set_for_mut(role).insert(account))
    }

    /// Remove `role` from `account`. Idempotent.
    ///
    /// Returns whether membership actually changed.
    pub fn revoke_role(
        &mut self,
        actor: &AccountId,
        role: Role,
        account: &AccountId,
    ) -> Result<bool, RegistryError> {
        self.ensure_role(actor, Role::Administrator)?;
        self.ensure_admin_operational()?;
        Ok(self.set_for_mut(role).remove(account))
    }

    /// Set the pause flag. Idempotent. Unpausing while paused is always
    /// reachable for administrators (pause does not gate itself).
    ///
    /// Returns whether the flag actually changed.
    pub fn set_paused(&mut self, actor: &AccountId, paused: bool) -> Result<bool, RegistryError> {
        self.ensure_role(actor, Role::Administrator)?;
        self.ensure_admin_operational()?;
        let changed = self.paused != paused;
        self.paused = paused;
        Ok(changed)
    }

    /// Engage or release the circuit breaker.
    ///
    /// While the breaker is engaged the only reachable mutation is this
    /// method with `engaged = false` — the "off switch" of the emergency
    /// stop. Re-engaging while engaged is an idempotent no-op.
    ///
    /// Returns whether the flag actually changed.
    pub fn set_circuit_breaker(
        &mut self,
        actor: &AccountId,
        engaged: bool,
    ) -> Result<bool, RegistryError> {
        self.ensure_role(actor, Role::Administrator)?;
        let changed = self.circuit_broken != engaged;
        self.circuit_broken = engaged;
        Ok(changed)
    }

    /// Transfer administrator ownership from `actor` to `new_admin`.
    ///
    /// Grants the administrator role to `new_admin` and removes it from
    /// `actor`. Transferring to oneself is a no-op success.
    pub fn transfer_admin(
        &mut self,
        actor: &AccountId,
        new_admin: AccountId,
    ) -> Result<(), RegistryError> {
        self.ensure_role(actor, Role::Administrator)?;
        self.ensure_admin_operational()?;
        if *actor == new_admin {
            return Ok(());
        }
        self.administrators.insert(new_admin);
        self.administrators.remove(actor);
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
