//! galeri-listings server entry point.
//!
//! Starts the Axum HTTP server with the listing, catalog, and ingestion
//! endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use galeri_listings::api;
use galeri_listings::app_state::AppState;
use galeri_listings::config::{ListingConfig, LogFormat};
use galeri_listings::persistence::{MemoryVehicleStore, PostgresVehicleStore, VehicleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ListingConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting galeri-listings");

    // Build persistence layer
    let store: Arc<dyn VehicleStore> = if config.persistence_enabled {
        let store = PostgresVehicleStore::connect(&config)
            .await
            .context("failed to connect to PostgreSQL")?;
        if config.run_migrations {
            store.migrate().await.context("failed to run migrations")?;
            tracing::info!("migrations applied");
        }
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled; listings are kept in memory");
        Arc::new(MemoryVehicleStore::new())
    };

    // Build application
    let app_state = AppState::from_config(store, &config);
    let app = api::build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
