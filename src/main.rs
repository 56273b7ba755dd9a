//! Payments Ledger - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool (lazily connecting)
//! 3. Optionally run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use tracing_subscriber::EnvFilter;

use payments_ledger::{
    config, db,
    repository::PgLedgerRepository,
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let state = match config.database_url() {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.database_max_connections)?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "Database pool created"
            );

            if config.run_migrations {
                db::run_migrations(&pool).await?;
                tracing::info!("Database migrations complete");
            }

            AppState::new(PgLedgerRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; ledger requests will fail until it is configured");
            AppState::unconfigured()
        }
    };

    let app = routes::create_router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
