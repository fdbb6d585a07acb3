mod api;
mod config;
mod scanner;
mod store;
mod store_manager;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::scanner::Scanner;
use crate::store::DashboardStore;
use crate::store_manager::StoreHandle;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dashboardd=info")),
        )
        .init();

    tracing::info!("Starting dashboardd");

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/dashboardd/dashboardd.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    tracing::info!("Loaded config from {}", config_path);
    tracing::info!(
        "Data directory {:?}, legacy directory {:?}",
        config.storage.data_dir,
        config.storage.legacy_dir
    );

    // Start the store thread
    let store = DashboardStore::new(&config.storage, &config.scan);
    let store_handle = StoreHandle::spawn(store);

    let scanner = Arc::new(Scanner::new(&config.scan));

    // Build API router
    let app_state = api::routes::AppState {
        store: store_handle.clone(),
        scanner,
    };
    let app = api::routes::router(app_state);

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("API listening on {}", config.api.listen);

    // Run server with graceful shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");

    // Trigger cancellation and wait for the server to drain
    cancel.cancel();
    let _ = server_handle.await;

    // Shutdown the store thread
    if let Err(e) = store_handle.shutdown().await {
        tracing::error!("Failed to shutdown store: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
