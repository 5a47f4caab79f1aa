//! # attestr CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use attestr_cli::demo::{run_demo, DemoArgs};
use attestr_cli::serve::{run_serve, ServeArgs};

/// Attestr Stack CLI
///
/// Operator tooling for the attestation registry: serve the HTTP API or
/// run a scripted lifecycle demo.
#[derive(Parser, Debug)]
#[command(name = "attestr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),

    /// Run a scripted issue → verify → revoke → re-verify walkthrough.
    Demo(DemoArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve(args) => run_serve(&args).await,
        Commands::Demo(args) => run_demo(&args),
    }
}
