//! `attestr serve` — run the HTTP API.

use clap::Args;

use attestr_api::state::{AppConfig, AppState};
use attestr_core::AccountId;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to bind (overrides the PORT environment variable).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Root administrator account (overrides ATTESTR_ROOT_ADMIN).
    #[arg(long)]
    pub root_admin: Option<String>,
}

/// Bind and serve the API until interrupted.
pub async fn run_serve(args: &ServeArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(raw) = &args.root_admin {
        config.root_admin = AccountId::new(raw.as_str())?;
    }

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
