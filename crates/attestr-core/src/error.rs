//! # Validation Errors
//!
//! Construction-time validation errors for the domain primitive newtypes,
//! built with `thiserror`. Each variant carries the invalid input and the
//! expected format so misconfiguration can be diagnosed without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Account identifier fails format validation.
    #[error("invalid account id: {0:?} (expected 1-128 printable ASCII characters, no whitespace)")]
    InvalidAccount(String),

    /// A 32-byte identifier could not be parsed from hex.
    #[error("invalid {kind} id: {value:?} (expected 64 lowercase hex characters)")]
    InvalidHexId {
        /// Which identifier namespace was being parsed ("credential" or "verification").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Timestamp is not valid RFC 3339 or uses a non-UTC offset.
    #[error("invalid timestamp: {0:?} (expected RFC 3339 with Z suffix)")]
    InvalidTimestamp(String),
}
