//! # Credential Issuance, Revocation, and Verification
//!
//! The registry's HTTP surface. Handlers are thin: parse and validate
//! the request, delegate to [`attestr_registry::Registry`], map errors
//! through [`AppError`].
//!
//! ## Endpoints
//!
//! - `POST /v1/credentials` — issue a credential.
//! - `POST /v1/credentials/batch` — issue a batch atomically.
//! - `GET /v1/credentials/:id` — full stored record.
//! - `POST /v1/credentials/:id/revoke` — revoke.
//! - `GET /v1/credentials/:id/verify` — validity report as of now.
//! - `POST /v1/credentials/verify` — batch validity check.
//! - `GET /v1/subjects/:account/credentials` — subject's index, paginated.
//! - `GET /v1/issuers/:account/credentials` — issuer's index, paginated.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use attestr_core::{AccountId, CredentialId, Timestamp};
use attestr_registry::{Credential, Page, VerifyReport};

use crate::error::AppError;
use crate::extractors::{extract_json, Actor};
use crate::routes::PageQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for credential issuance.
#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub subject: AccountId,
    pub metadata_uri: String,
    /// RFC 3339 UTC expiry; absent means the credential never expires.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// Response from single issuance.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueResponse {
    pub id: CredentialId,
}

/// Request body for atomic batch issuance. Arrays are parallel and must
/// have equal lengths.
#[derive(Debug, Deserialize)]
pub struct BatchIssueRequest {
    pub subjects: Vec<AccountId>,
    pub metadata_uris: Vec<String>,
    #[serde(default)]
    pub expiries: Vec<Option<Timestamp>>,
}

/// Response from batch issuance, ids in input order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchIssueResponse {
    pub ids: Vec<CredentialId>,
}

/// Request body for batch verification.
#[derive(Debug, Deserialize)]
pub struct BatchVerifyRequest {
    pub ids: Vec<CredentialId>,
}

/// Response from batch verification, order-preserving.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchVerifyResponse {
    pub results: Vec<bool>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/credentials", post(issue))
        .route("/v1/credentials/batch", post(batch_issue))
        .route("/v1/credentials/verify", post(batch_verify))
        .route("/v1/credentials/:id", get(get_credential))
        .route("/v1/credentials/:id/revoke", post(revoke))
        .route("/v1/credentials/:id/verify", get(verify))
        .route("/v1/subjects/:account/credentials", get(for_subject))
        .route("/v1/issuers/:account/credentials", get(for_issuer))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/credentials — issue a credential as the acting account.
async fn issue(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<IssueRequest>, JsonRejection>,
) -> Result<Json<IssueResponse>, AppError> {
    let req = extract_json(body)?;
    let id = state
        .registry
        .issue(&actor, req.subject, req.metadata_uri, req.expires_at)?;
    Ok(Json(IssueResponse { id }))
}

/// POST /v1/credentials/batch — atomic batch issuance.
async fn batch_issue(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<BatchIssueRequest>, JsonRejection>,
) -> Result<Json<BatchIssueResponse>, AppError> {
    let req = extract_json(body)?;
    // Absent expiries means "none of them expire".
    let expiries = if req.expiries.is_empty() && !req.subjects.is_empty() {
        vec![None; req.subjects.len()]
    } else {
        req.expiries
    };
    let ids = state
        .registry
        .batch_issue(&actor, &req.subjects, &req.metadata_uris, &expiries)?;
    Ok(Json(BatchIssueResponse { ids }))
}

/// GET /v1/credentials/:id — the full stored record.
async fn get_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Credential>, AppError> {
    let id = CredentialId::parse(&id)?;
    Ok(Json(state.registry.get(&id)?))
}

/// POST /v1/credentials/:id/revoke — revoke as the acting account.
async fn revoke(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = CredentialId::parse(&id)?;
    state.registry.revoke(&actor, &id)?;
    Ok(Json(serde_json::json!({ "revoked": true })))
}

/// GET /v1/credentials/:id/verify — validity as of now.
async fn verify(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VerifyReport>, AppError> {
    let id = CredentialId::parse(&id)?;
    Ok(Json(state.registry.verify(&id)?))
}

/// POST /v1/credentials/verify — batch validity, unknown ids read false.
async fn batch_verify(
    State(state): State<AppState>,
    body: Result<Json<BatchVerifyRequest>, JsonRejection>,
) -> Result<Json<BatchVerifyResponse>, AppError> {
    let req = extract_json(body)?;
    Ok(Json(BatchVerifyResponse {
        results: state.registry.batch_verify(&req.ids),
    }))
}

/// GET /v1/subjects/:account/credentials — paginated subject index.
async fn for_subject(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<CredentialId>>, AppError> {
    let account = AccountId::new(account)?;
    Ok(Json(state.registry.credentials_for_subject(
        &account,
        page.offset,
        page.limit,
    )))
}

/// GET /v1/issuers/:account/credentials — paginated issuer index.
async fn for_issuer(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<CredentialId>>, AppError> {
    let account = AccountId::new(account)?;
    Ok(Json(state.registry.credentials_for_issuer(
        &account,
        page.offset,
        page.limit,
    )))
}
