//! # Attestr Registry
//!
//! In-memory credential registry: issuance, revocation, verification,
//! role-based access control, and an append-only event log.
//!
//! A credential is a claim an issuer makes about a subject. The record
//! is write-once apart from one monotonic transition:
//!
//! ```text
//!   issue ──▶ ACTIVE ──revoke──▶ REVOKED   (terminal)
//!                │
//!                └── expiry passes ──▶ reads as invalid (no mutation)
//! ```
//!
//! Validity is always computed at read time from `revoked`, `expires_at`,
//! and the query clock. Nothing ever deletes a credential or rewrites its
//! identity fields.
//!
//! Entry point is [`Registry`]; everything else supports it.

pub mod access;
pub mod credential;
pub mod error;
pub mod event;
pub mod index;
pub mod registry;

pub use access::{AccessControl, Role};
pub use credential::{Credential, VerifyReport};
pub use error::RegistryError;
pub use event::{EventLog, EventSink, RegistryEvent};
pub use index::{IdIndex, Page};
pub use registry::Registry;
