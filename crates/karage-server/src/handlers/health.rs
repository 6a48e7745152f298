// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use karage_core::db;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Whether the database answered.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// GET /v1/health - Liveness plus a database ping.
///
/// Intentionally unauthenticated for load balancer probes.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = db::health_check(&state.pool).await.unwrap_or(false);

    Json(HealthResponse {
        healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
