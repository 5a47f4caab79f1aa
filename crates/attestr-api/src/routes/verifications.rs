//! # Verification Recording
//!
//! HTTP surface over [`attestr_verifier::Verifier`]: record who checked
//! which credential and read the resulting history.
//!
//! ## Endpoints
//!
//! - `POST /v1/verifications` — record a verification.
//! - `POST /v1/verifications/batch` — record a batch atomically.
//! - `GET /v1/verifications/:id` — a stored record.
//! - `GET /v1/verifications/events` — verifier event log from an offset.
//! - `GET /v1/verifiers/:account/history` — recording history, paginated.
//! - `GET /v1/verifiers/:account/access` — whether the account may record.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use attestr_core::{AccountId, CredentialId, VerificationId};
use attestr_registry::Page;
use attestr_verifier::{VerificationRecord, VerifierEvent};

use crate::error::AppError;
use crate::extractors::{extract_json, Actor};
use crate::routes::admin::EventsQuery;
use crate::routes::PageQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for recording a verification.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub credential_id: CredentialId,
}

/// Response from single recording.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: VerificationId,
}

/// Request body for atomic batch recording.
#[derive(Debug, Deserialize)]
pub struct BatchRecordRequest {
    pub credential_ids: Vec<CredentialId>,
}

/// Response from batch recording, ids in input order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRecordResponse {
    pub ids: Vec<VerificationId>,
}

/// A window of the verifier event log.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifierEventsResponse {
    pub events: Vec<VerifierEvent>,
    /// Offset to pass as `from` on the next poll.
    pub next: usize,
}

/// Whether an account may record verifications.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
    pub may_record: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/verifications", post(record))
        .route("/v1/verifications/batch", post(batch_record))
        .route("/v1/verifications/:id", get(get_record))
        .route("/v1/verifications/events", get(events))
        .route("/v1/verifiers/:account/history", get(history))
        .route("/v1/verifiers/:account/access", get(access))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/verifications — record as the acting account.
async fn record(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<RecordRequest>, JsonRejection>,
) -> Result<Json<RecordResponse>, AppError> {
    let req = extract_json(body)?;
    let id = state.verifier.record(&actor, &req.credential_id)?;
    Ok(Json(RecordResponse { id }))
}

/// POST /v1/verifications/batch — atomic batch recording.
async fn batch_record(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<BatchRecordRequest>, JsonRejection>,
) -> Result<Json<BatchRecordResponse>, AppError> {
    let req = extract_json(body)?;
    let ids = state.verifier.batch_record(&actor, &req.credential_ids)?;
    Ok(Json(BatchRecordResponse { ids }))
}

/// GET /v1/verifications/:id — a stored verification record.
async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VerificationRecord>, AppError> {
    let id = VerificationId::parse(&id)?;
    Ok(Json(state.verifier.get(&id)?))
}

/// GET /v1/verifications/events — verifier event feed for indexers.
async fn events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<VerifierEventsResponse> {
    let events = state.verifier.event_log().events_from(query.from);
    let next = query.from + events.len();
    Json(VerifierEventsResponse { events, next })
}

/// GET /v1/verifiers/:account/history — paginated recording history.
async fn history(
    State(state): State<AppState>,
    Path(account): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<VerificationId>>, AppError> {
    let account = AccountId::new(account)?;
    Ok(Json(
        state.verifier.history(&account, page.offset, page.limit),
    ))
}

/// GET /v1/verifiers/:account/access — record capability check.
async fn access(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<AccessResponse>, AppError> {
    let account = AccountId::new(account)?;
    Ok(Json(AccessResponse {
        may_record: state.verifier.may_record(&account),
    }))
}
