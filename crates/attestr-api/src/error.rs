//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from attestr-registry and attestr-verifier to HTTP
//! status codes and JSON error bodies with a machine-readable code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use attestr_core::ValidationError;
use attestr_registry::RegistryError;
use attestr_verifier::VerifierError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "REGISTRY_PAUSED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps domain errors to HTTP status codes and structured JSON bodies.
/// Internal error details are never exposed to clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing caller identity (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller identified but lacks the required role (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state, e.g. re-revocation (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Registry is paused (503).
    #[error("registry paused: {0}")]
    Suspended(String),

    /// Emergency circuit breaker engaged (503).
    #[error("circuit breaker engaged: {0}")]
    CircuitBroken(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Suspended(_) => (StatusCode::SERVICE_UNAVAILABLE, "REGISTRY_PAUSED"),
            Self::CircuitBroken(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CIRCUIT_BREAKER_ENGAGED")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Core validation failures (bad account ids, malformed hex ids) are
/// client errors.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match &err {
            RegistryError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            RegistryError::NotFound(_) => Self::NotFound(err.to_string()),
            RegistryError::InvalidArgument(_) => Self::Validation(err.to_string()),
            RegistryError::Suspended => Self::Suspended(err.to_string()),
            RegistryError::CircuitBroken => Self::CircuitBroken(err.to_string()),
            RegistryError::AlreadyRevoked(_) => Self::Conflict(err.to_string()),
        }
    }
}

impl From<VerifierError> for AppError {
    fn from(err: VerifierError) -> Self {
        match err {
            VerifierError::CredentialNotFound(_) | VerifierError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            VerifierError::Access(inner) => inner.into(),
            VerifierError::NotRoleGated => Self::Conflict(err.to_string()),
        }
    }
}
