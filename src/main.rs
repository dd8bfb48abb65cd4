//! Main entry point for the drive-mirror CLI

use clap::Parser;
use drive_mirror::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("drive_mirror=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Mirror(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
        Commands::List(ref args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
    };

    // Per-item failures are only recorded; an Err here is a fatal,
    // run-level problem.
    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
