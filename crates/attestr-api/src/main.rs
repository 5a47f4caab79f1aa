//! # attestr-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Attestr stack.
//! Binds to configurable port (default 8080).

use attestr_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid ATTESTR_ROOT_ADMIN: {e}");
        e
    })?;
    let port = config.port;
    tracing::info!(root_admin = %config.root_admin, "registry root administrator seeded");

    let state = AppState::with_config(config);
    let app = attestr_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Attestr API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
