// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pedal-Tracker API Server
//!
//! Turns finished bike routes into levels, goal rewards, points and
//! redeemable coupons for each authenticated rider.

use pedal_tracker::{config::Config, db::LocalStore, services::ProgressService, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Pedal-Tracker API");

    // Open the snapshot store
    let store = match &config.data_dir {
        Some(dir) => LocalStore::open(dir).await?,
        None => {
            tracing::warn!("DATA_DIR not set; rider progress is kept in memory only");
            LocalStore::new_memory()
        }
    };

    let progress = ProgressService::new(store, config.car_consumption_km_per_l);
    tracing::info!(
        car_consumption_km_per_l = config.car_consumption_km_per_l,
        "Progress service initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        progress,
    });

    // Build router
    let app = pedal_tracker::routes::create_router(state);

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

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pedal_tracker=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
