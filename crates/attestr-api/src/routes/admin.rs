//! # Administration and Observability
//!
//! Role management, safety flags, admin transfer, and the registry event
//! feed for off-process indexers.
//!
//! ## Endpoints
//!
//! - `POST /v1/admin/roles/grant` / `POST /v1/admin/roles/revoke`
//! - `POST /v1/admin/pause` — set/clear the pause flag.
//! - `POST /v1/admin/circuit-breaker` — engage/release the breaker.
//! - `POST /v1/admin/transfer` — hand over administrator ownership.
//! - `GET /v1/admin/status` — current flag state.
//! - `GET /v1/events` — registry event log from an offset.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use attestr_core::AccountId;
use attestr_registry::{RegistryEvent, Role};

use crate::error::AppError;
use crate::extractors::{extract_json, Actor};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for role grant/revoke.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
    pub account: AccountId,
}

/// Request body for the pause flag.
#[derive(Debug, Deserialize)]
pub struct PauseRequest {
    pub paused: bool,
}

/// Request body for the circuit breaker.
#[derive(Debug, Deserialize)]
pub struct CircuitBreakerRequest {
    pub engaged: bool,
}

/// Request body for admin transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub new_admin: AccountId,
}

/// Current safety flag state.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub paused: bool,
    pub circuit_broken: bool,
    pub credential_count: usize,
}

/// Query for the event feed.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Log offset to read from; 0 replays everything.
    #[serde(default)]
    pub from: usize,
}

/// A window of the registry event log.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<RegistryEvent>,
    /// Offset to pass as `from` on the next poll.
    pub next: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/roles/grant", post(grant_role))
        .route("/v1/admin/roles/revoke", post(revoke_role))
        .route("/v1/admin/pause", post(set_paused))
        .route("/v1/admin/circuit-breaker", post(set_circuit_breaker))
        .route("/v1/admin/transfer", post(transfer_admin))
        .route("/v1/admin/status", get(status))
        .route("/v1/events", get(events))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/admin/roles/grant
async fn grant_role(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = extract_json(body)?;
    state.registry.grant_role(&actor, req.role, req.account)?;
    Ok(Json(serde_json::json!({ "granted": true })))
}

/// POST /v1/admin/roles/revoke
async fn revoke_role(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = extract_json(body)?;
    state.registry.revoke_role(&actor, req.role, &req.account)?;
    Ok(Json(serde_json::json!({ "revoked": true })))
}

/// POST /v1/admin/pause
async fn set_paused(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<PauseRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = extract_json(body)?;
    state.registry.set_paused(&actor, req.paused)?;
    Ok(Json(serde_json::json!({ "paused": req.paused })))
}

/// POST /v1/admin/circuit-breaker
async fn set_circuit_breaker(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<CircuitBreakerRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = extract_json(body)?;
    state.registry.set_circuit_breaker(&actor, req.engaged)?;
    Ok(Json(serde_json::json!({ "engaged": req.engaged })))
}

/// POST /v1/admin/transfer
async fn transfer_admin(
    State(state): State<AppState>,
    Actor(actor): Actor,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = extract_json(body)?;
    state.registry.transfer_admin(&actor, req.new_admin)?;
    Ok(Json(serde_json::json!({ "transferred": true })))
}

/// GET /v1/admin/status — open read, no actor required.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        paused: state.registry.is_paused(),
        circuit_broken: state.registry.is_circuit_broken(),
        credential_count: state.registry.credential_count(),
    })
}

/// GET /v1/events — registry event feed for indexers.
async fn events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let events = state.registry.event_log().events_from(query.from);
    let next = query.from + events.len();
    Json(EventsResponse { events, next })
}
