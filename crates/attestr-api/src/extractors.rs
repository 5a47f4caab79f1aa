//! # Custom Extractors
//!
//! Caller identity extraction and JSON body helpers.
//!
//! The API carries no authentication layer; callers assert their
//! identity through the `x-attestr-actor` header and the domain layer
//! decides what that identity may do. A missing header is 401, an
//! identity without the required role is 403 from the domain.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Json;

use attestr_core::AccountId;

use crate::error::AppError;

/// Header carrying the asserted caller identity.
pub const ACTOR_HEADER: &str = "x-attestr-actor";

/// The asserted caller identity, extracted from [`ACTOR_HEADER`].
#[derive(Debug, Clone)]
pub struct Actor(pub AccountId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| {
                AppError::Unauthorized(format!("missing {ACTOR_HEADER} header"))
            })?
            .to_str()
            .map_err(|_| {
                AppError::Unauthorized(format!("{ACTOR_HEADER} header is not valid UTF-8"))
            })?;
        let account = AccountId::new(raw)
            .map_err(|e| AppError::Unauthorized(format!("invalid actor identity: {e}")))?;
        Ok(Self(account))
    }
}

/// Extract a JSON body, mapping deserialization errors to
/// [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
