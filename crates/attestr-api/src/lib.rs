//! # attestr-api — Axum HTTP Surface for the Attestr Stack
//!
//! Thin HTTP layer over the credential registry and the verification
//! recorder. Handlers parse, delegate, and map errors; all business
//! rules live in `attestr-registry` and `attestr-verifier`.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                    | Domain            |
//! |-------------------------|---------------------------|-------------------|
//! | `/v1/credentials/*`     | [`routes::credentials`]   | Registry          |
//! | `/v1/subjects/*`        | [`routes::credentials`]   | Registry indices  |
//! | `/v1/issuers/*`         | [`routes::credentials`]   | Registry indices  |
//! | `/v1/verifications/*`   | [`routes::verifications`] | Verifier          |
//! | `/v1/verifiers/*`       | [`routes::verifications`] | Verifier history  |
//! | `/v1/admin/*`           | [`routes::admin`]         | Roles and flags   |
//! | `/v1/events`            | [`routes::admin`]         | Event feed        |
//!
//! Caller identity is asserted via the `x-attestr-actor` header; the
//! domain layer decides what that identity may do.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted separately so they stay
/// reachable regardless of registry flag state.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::credentials::router())
        .merge(routes::verifications::router())
        .merge(routes::admin::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
