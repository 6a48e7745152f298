// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Loyalty card endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use karage_connections::loyalty::CardholderProfile;
use karage_core::db;
use karage_core::mapping::MappingKind;
use karage_core::webhooks;

use crate::auth::{self, SessionPrincipal};
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::AppState;

use super::required;

/// Request body for card creation.
///
/// The platform speaks PascalCase on the wire, as everywhere else.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCardRequest {
    /// Customer to issue a card for.
    pub customer_id: Option<i64>,
}

/// Response body for card creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateCardResponse {
    /// Customer the card belongs to.
    pub customer_id: i64,
    /// Card number assigned by the loyalty provider.
    pub card_no: String,
}

/// POST /v1/loyalty/cards - Issue a loyalty card for a customer.
///
/// Idempotent: an existing mapping is returned as-is with no provider
/// call; the first request per customer creates exactly one card and one
/// mapping row.
pub async fn create_card(
    State(state): State<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    AppJson(request): AppJson<CreateCardRequest>,
) -> ApiResult<Json<CreateCardResponse>> {
    let customer_id = required(request.customer_id, "CustomerId")?;

    let customer = db::get_customer(&state.pool, customer_id, principal.location_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("customer {}", customer_id)))?;

    let profile = CardholderProfile {
        customer_id: customer.customer_id,
        name: customer.name,
        phone: customer.phone,
        email: customer.email,
    };

    let loyalty = state.loyalty.clone();
    let card_no = state
        .mappings
        .resolve_or_create(
            MappingKind::LoyaltyCard,
            customer_id,
            principal.location_id,
            || async move { loyalty.create_card(&profile).await },
        )
        .await?;

    Ok(Json(CreateCardResponse {
        customer_id,
        card_no,
    }))
}

/// POST /v1/loyalty/events - Card install/uninstall webhook.
///
/// Always answers 200 after the secret check; a processing failure is
/// logged, never bounced, so the provider does not retry-storm us.
pub async fn card_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    auth::verify_event_secret(&headers, &state.auth.event_secret)?;

    if let Err(e) = process_card_event(&state, &body).await {
        tracing::error!(error = %e, "Loyalty card event processing failed");
    }

    Ok(Json(json!({"received": true})))
}

async fn process_card_event(state: &AppState, body: &[u8]) -> ApiResult<()> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {}", e)))?;

    let card_no = payload
        .get("CardNo")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("CardNo is required".to_string()))?;

    let event = payload
        .get("Event")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("Event is required".to_string()))?;

    let card_state = match event {
        "install" => "installed",
        "uninstall" => "uninstalled",
        other => {
            return Err(ApiError::BadRequest(format!(
                "unknown card event: {}",
                other
            )));
        }
    };

    webhooks::upsert_card_state(&state.pool, card_no, card_state)
        .await
        .map_err(ApiError::from)?;

    Ok(())
}
