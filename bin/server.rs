// Customer Rewards - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use customer_rewards::{api, init_tracing, Config, RewardsService, SqliteStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database at {:?}", config.db_path))?;
    info!(db_path = ?config.db_path, "database opened");

    let service = RewardsService::new(Arc::new(store));
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    let addr = listener.local_addr()?;
    info!(%addr, version = customer_rewards::VERSION, "rewards server listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
