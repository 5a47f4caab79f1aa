//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The registry and verifier are the only stateful services; both are
//! `Arc`-shared and internally locked, so `AppState` clones cheaply per
//! request.

use std::sync::Arc;

use attestr_core::AccountId;
use attestr_registry::Registry;
use attestr_verifier::Verifier;

/// Application configuration, assembled from the environment in the
/// binary entry points.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Account seeded as the registry's root administrator.
    pub root_admin: AccountId,
}

impl AppConfig {
    /// Read `PORT` and `ATTESTR_ROOT_ADMIN` from the environment,
    /// falling back to port 8080 and admin account `"root"`.
    ///
    /// # Errors
    ///
    /// Fails if `ATTESTR_ROOT_ADMIN` is set to an invalid account id.
    pub fn from_env() -> Result<Self, attestr_core::ValidationError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let root_admin = match std::env::var("ATTESTR_ROOT_ADMIN") {
            Ok(raw) => AccountId::new(raw)?,
            Err(_) => AccountId::new("root")?,
        };
        Ok(Self { port, root_admin })
    }
}

/// Shared application state accessible to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub verifier: Arc<Verifier>,
    pub config: AppConfig,
}

impl AppState {
    /// Fresh registry plus an open-mode verifier over it, rooted at the
    /// configured admin account.
    pub fn with_config(config: AppConfig) -> Self {
        let registry = Registry::shared(config.root_admin.clone());
        let verifier = Arc::new(Verifier::open(Arc::clone(&registry)));
        Self {
            registry,
            verifier,
            config,
        }
    }
}
