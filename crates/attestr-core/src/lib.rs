//! # attestr-core — Foundational Types for the Attestr Protocol
//!
//! This crate is the leaf of the workspace dependency DAG. It defines the
//! primitive types shared by the registry and verifier: validated identity
//! newtypes, opaque hash-derived identifiers, and UTC-only timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`,
//!    `CredentialId`, `VerificationId` — no bare strings or byte arrays
//!    for identifiers, and no way to pass a verification id where a
//!    credential id is expected.
//!
//! 2. **Identifiers are opaque tokens.** `CredentialId` and
//!    `VerificationId` are 32-byte values derived through a
//!    domain-separated SHA-256 construction. Callers parse and render
//!    them as hex but never interpret their contents.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix and
//!    seconds precision. Expiry is `Option<Timestamp>` — `None` means the
//!    credential never expires.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `attestr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::ValidationError;
pub use identity::{AccountId, CredentialId, VerificationId};
pub use temporal::Timestamp;
