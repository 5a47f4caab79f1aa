//! # Attestr Verifier
//!
//! Append-only verification records over the credential registry.
//!
//! A verification record answers "who checked what, when, and what did
//! the registry say at that moment". Records are historical facts: they
//! are never updated when the underlying credential later changes state.
//!
//! Construct with [`Verifier::open`] (anyone may record) or
//! [`Verifier::role_gated`] (recording requires the Verifier role,
//! managed independently of the registry's own role sets).

pub mod error;
pub mod event;
pub mod record;
pub mod verifier;

pub use error::VerifierError;
pub use event::{VerifierEvent, VerifierLog};
pub use record::VerificationRecord;
pub use verifier::Verifier;
