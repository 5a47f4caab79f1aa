//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers of the Attestr Protocol.
//! Each identifier is a distinct type — you cannot pass a
//! [`VerificationId`] where a [`CredentialId`] is expected.
//!
//! ## Validation
//!
//! [`AccountId`] validates format at construction time. [`CredentialId`]
//! and [`VerificationId`] are derived through a domain-separated SHA-256
//! construction and are valid by construction; parsing from hex validates
//! length and alphabet.
//!
//! ## Opacity
//!
//! The 32-byte identifiers are opaque tokens. The derivation inputs
//! (issuer, subject, sequence, timestamp) guarantee uniqueness via the
//! monotonic sequence number, but callers must never parse or predict an
//! identifier's contents.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;
use crate::temporal::Timestamp;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// An account identity: an issuer, subject, verifier, or administrator.
///
/// In the source environment this is a chain address; here it is a
/// validated opaque string. The registry never interprets it beyond
/// equality and index lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Maximum accepted length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Create an account id, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAccount`] if the string is empty,
    /// longer than [`AccountId::MAX_LEN`], or contains non-printable or
    /// whitespace characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return Err(ValidationError::InvalidAccount(s.to_string()));
        }
        if !s.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ValidationError::InvalidAccount(s.to_string()));
        }
        Ok(())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> String {
        id.0
    }
}

impl std::str::FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Hex helpers (shared by the 32-byte identifier types)
// ---------------------------------------------------------------------------

fn bytes_to_hex(bytes: &[u8; 32]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_to_bytes(s: &str) -> Option<[u8; 32]> {
    if s.len() != 64 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return None;
    }
    let mut out = [0u8; 32];
    for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
        let hi = (chunk[0] as char).to_digit(16)?;
        let lo = (chunk[1] as char).to_digit(16)?;
        out[i] = ((hi << 4) | lo) as u8;
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// CredentialId
// ---------------------------------------------------------------------------

/// Domain-separation tag for credential id derivation.
const CREDENTIAL_ID_TAG: &[u8] = b"attestr:credential:v1";

/// Domain-separation tag for verification id derivation.
const VERIFICATION_ID_TAG: &[u8] = b"attestr:verification:v1";

/// Opaque unique identifier of a credential.
///
/// Rendered as 64 lowercase hex characters. Derived once at issuance via
/// [`CredentialId::derive`]; never reused, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialId([u8; 32]);

impl CredentialId {
    /// Derive a fresh credential id from the issuance inputs.
    ///
    /// The registry-wide `sequence` number makes the derivation unique
    /// even for identical issuer/subject/timestamp triples.
    pub fn derive(
        issuer: &AccountId,
        subject: &AccountId,
        sequence: u64,
        issued_at: Timestamp,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(CREDENTIAL_ID_TAG);
        hasher.update(issuer.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(subject.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(sequence.to_be_bytes());
        hasher.update(issued_at.epoch_secs().to_be_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Construct from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character lowercase hex string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHexId`] on wrong length or
    /// non-hex characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        hex_to_bytes(s)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidHexId {
                kind: "credential",
                value: s.to_string(),
            })
    }

    /// The raw 32-byte value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }
}

impl std::str::FromStr for CredentialId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for CredentialId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct CredentialIdVisitor;

impl Visitor<'_> for CredentialIdVisitor {
    type Value = CredentialId;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a 64-character lowercase hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        CredentialId::parse(v).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for CredentialId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CredentialIdVisitor)
    }
}

// ---------------------------------------------------------------------------
// VerificationId
// ---------------------------------------------------------------------------

/// Opaque unique identifier of a verification record.
///
/// Distinct namespace from [`CredentialId`] — the two derivations use
/// different domain-separation tags, so the id spaces cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerificationId([u8; 32]);

impl VerificationId {
    /// Derive a fresh verification id from the recording inputs.
    pub fn derive(
        verifier: &AccountId,
        credential: &CredentialId,
        sequence: u64,
        verified_at: Timestamp,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(VERIFICATION_ID_TAG);
        hasher.update(verifier.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(credential.as_bytes());
        hasher.update(sequence.to_be_bytes());
        hasher.update(verified_at.epoch_secs().to_be_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Construct from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character lowercase hex string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHexId`] on wrong length or
    /// non-hex characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        hex_to_bytes(s)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidHexId {
                kind: "verification",
                value: s.to_string(),
            })
    }

    /// The raw 32-byte value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }
}

impl std::str::FromStr for VerificationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for VerificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for VerificationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct VerificationIdVisitor;

impl Visitor<'_> for VerificationIdVisitor {
    type Value = VerificationId;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a 64-character lowercase hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        VerificationId::parse(v).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for VerificationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(VerificationIdVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
