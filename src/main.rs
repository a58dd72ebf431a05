// SPDX-License-Identifier: MIT

//! Levelup-Tracker API Server
//!
//! Tracks a multi-week daily-challenge run: a fixed task list, per-day
//! completion history, and derived rank/level/stat progress.

use levelup_tracker::{config::Config, db::FirestoreDb, models::TaskCatalog, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Levelup-Tracker API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Load the task catalog; fall back to the built-in list when no
    // catalog file is deployed.
    let catalog = match TaskCatalog::load_from_file(&config.catalog_path) {
        Ok(catalog) => {
            tracing::info!(path = %config.catalog_path, count = catalog.len(), "Task catalog loaded");
            catalog
        }
        Err(e) => {
            tracing::warn!(path = %config.catalog_path, error = %e, "Using built-in task catalog");
            TaskCatalog::default()
        }
    };

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        catalog,
    });

    // Build router
    let app = levelup_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("levelup_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
