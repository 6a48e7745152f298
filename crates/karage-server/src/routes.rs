// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Route configuration.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (intentionally unauthenticated for probes)
        .route("/v1/health", get(handlers::health::health_check))
        // Loyalty cards
        .route("/v1/loyalty/cards", post(handlers::loyalty::create_card))
        .route("/v1/loyalty/events", post(handlers::loyalty::card_event))
        // Catalog sync
        .route("/v1/catalog/sync", post(handlers::catalog::sync_item))
        // Installment payments
        .route(
            "/v1/payments/installments",
            post(handlers::payments::create_installment),
        )
        .route(
            "/v1/payments/installments/events",
            post(handlers::payments::payment_event),
        )
        // E-signature
        .route("/v1/esign/requests", post(handlers::esign::create_request))
        .route("/v1/esign/callback", get(handlers::esign::signing_callback))
        // SMS/OTP
        .route("/v1/sms/otp", post(handlers::sms::send_otp))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
