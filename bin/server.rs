// Stock Pairing - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stock_pairing::api::{router, AppState};
use stock_pairing::{logging, open_database, AppConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "stock-server", about = "HTTP API for products and best-pair selection")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logger(&config.logging, args.verbose);

    let conn = open_database(&config.database.path)
        .with_context(|| format!("Failed to open database at {}", config.database.path.display()))?;
    info!(path = %config.database.path.display(), "database opened");

    let app = router(AppState::new(conn, config.budget));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind_addr))?;

    info!(
        addr = %config.server.bind_addr,
        budget_min = config.budget.min,
        budget_max = config.budget.max,
        "server running"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
