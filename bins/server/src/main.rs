//! Ledgerview API Server
//!
//! Main entry point for the statement of account service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use ledgerview_api::{AppState, create_router};
use ledgerview_db::connect_with;
use ledgerview_shared::{AppConfig, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.log).context("Failed to initialize tracing")?;

    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );
    info!(
        strategy = ?config.statement.balance_strategy,
        default_per_page = config.statement.default_per_page,
        "Statement settings"
    );

    let app = create_router(AppState::new(db, config.statement.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
