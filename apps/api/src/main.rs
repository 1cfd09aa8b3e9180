use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cyberbank_api::api::{build_router, AppState};
use cyberbank_api::config::Config;
use cyberbank_api::infrastructure::Database;
use cyberbank_api::shutdown::shutdown_signal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cyberbank_api=debug,sqlx=warn,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration (reads .env when present)
    let config = Config::from_env().context("Failed to load configuration")?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let database = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected successfully");

    database
        .migrate()
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations complete");

    let state = AppState::from_database(&database, &config);
    state
        .images
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", config.upload_dir))?;

    let app = build_router(state);

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    database.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}
