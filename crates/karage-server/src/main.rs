// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Karage Server - Integration backend entrypoint
//!
//! An HTTP API bridging the Karage order/customer/catalog database with
//! loyalty card, installment payment, e-signature, SMS/OTP, and
//! unit-of-measure providers.

use tracing::{info, warn};

use karage_core::Config;
use karage_core::migrations;
use karage_server::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "karage_server=info,karage_core=info".into()),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    // Load configuration
    let config = Config::from_env()?;

    info!(http_addr = %config.http_addr, "Starting Karage integration backend");

    // Connect to database
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    info!("Connected to database");

    migrations::run(&pool).await?;

    info!("Database schema verified");

    let state = AppState::new(&config, pool);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;

    info!(addr = %config.http_addr, "Karage server ready");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    info!("Karage server shut down");

    Ok(())
}
