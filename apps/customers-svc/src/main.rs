//! # Mesa Customers Service
//!
//! NATS microservice owning customer records and their carts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Customers Service                                 │
//! │                                                                         │
//! │  Gateway ───► NATS (patterns) ───► Handlers ───► Services ───► SQLite  │
//! │                     │                                                   │
//! │                     └── order_paid event (fire-and-forget)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod dto;
mod error;
mod handlers;
mod services;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SvcConfig;
use crate::handlers::AppContext;
use mesa_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Mesa customers service...");

    // Load configuration
    let config = SvcConfig::load()?;
    info!(
        nats_url = %config.nats_url,
        database_path = %config.database_path,
        "Configuration loaded"
    );

    // Connect to the database and run migrations
    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Connected to SQLite");

    // Connect to NATS
    let client = async_nats::connect(config.nats_url.as_str()).await?;
    info!("Connected to NATS");

    // Subscribe every message pattern
    let ctx = Arc::new(AppContext::new(db.clone()));
    let tasks = handlers::serve(client.clone(), ctx, config.queue_group.clone()).await?;
    info!(patterns = tasks.len(), "Message patterns subscribed");

    // Run until a shutdown signal arrives
    shutdown_signal().await;

    for task in &tasks {
        task.abort();
    }
    let _ = client.flush().await;
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
