// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Installment payment endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use karage_connections::installments::InstallmentOrder;
use karage_core::db;
use karage_core::mapping::MappingKind;
use karage_core::webhooks::{self, PaymentEvent};

use crate::auth::{self, SessionPrincipal};
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::AppState;

use super::required;

/// Allowed installment counts.
const INSTALLMENT_RANGE: std::ops::RangeInclusive<i32> = 2..=12;

/// Request body for installment checkout creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateInstallmentRequest {
    /// Checkout to finance.
    pub checkout_id: Option<i64>,
    /// Requested number of installments.
    pub installment_count: Option<i32>,
}

/// Response body for installment checkout creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateInstallmentResponse {
    /// Financed checkout.
    pub checkout_id: i64,
    /// Payment ID assigned by the installment provider.
    pub payment_id: String,
}

/// POST /v1/payments/installments - Open an installment checkout.
///
/// Idempotent through the bill mapping: a checkout already registered with
/// the provider returns its existing payment ID without a second call.
pub async fn create_installment(
    State(state): State<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    AppJson(request): AppJson<CreateInstallmentRequest>,
) -> ApiResult<Json<CreateInstallmentResponse>> {
    let checkout_id = required(request.checkout_id, "CheckoutId")?;
    let installment_count = required(request.installment_count, "InstallmentCount")?;

    if !INSTALLMENT_RANGE.contains(&installment_count) {
        return Err(ApiError::BadRequest(format!(
            "InstallmentCount must be between {} and {}",
            INSTALLMENT_RANGE.start(),
            INSTALLMENT_RANGE.end()
        )));
    }

    let checkout = db::get_checkout(&state.pool, checkout_id, principal.location_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("checkout {}", checkout_id)))?;

    let order = InstallmentOrder {
        reference: checkout.checkout_id,
        amount: checkout.total_amount,
        installment_count,
    };

    let installments = state.installments.clone();
    let payment_id = state
        .mappings
        .resolve_or_create(
            MappingKind::Bill,
            checkout_id,
            principal.location_id,
            || async move { installments.create_checkout(&order).await },
        )
        .await?;

    Ok(Json(CreateInstallmentResponse {
        checkout_id,
        payment_id,
    }))
}

/// POST /v1/payments/installments/events - Payment notification webhook.
///
/// Upserts the notification by its `PaymentId` natural key and propagates
/// the status to the checkout inside one transaction. Always answers 200
/// after the secret check; a processing failure is logged, never bounced.
pub async fn payment_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    auth::verify_event_secret(&headers, &state.auth.event_secret)?;

    if let Err(e) = process_payment_event(&state, &body).await {
        tracing::error!(error = %e, "Payment event processing failed");
    }

    Ok(Json(json!({"received": true})))
}

async fn process_payment_event(state: &AppState, body: &[u8]) -> ApiResult<()> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {}", e)))?;

    let payment_id = payload
        .get("PaymentId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("PaymentId is required".to_string()))?;

    let status = payload
        .get("Status")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("Status is required".to_string()))?;

    let event = PaymentEvent {
        payment_id: payment_id.to_string(),
        checkout_id: payload.get("CheckoutId").and_then(|v| v.as_i64()),
        status: status.to_string(),
        amount: payload.get("Amount").and_then(|v| v.as_i64()),
        installment_count: payload
            .get("InstallmentCount")
            .and_then(|v| v.as_i64())
            .map(|n| n as i32),
        raw_payload: payload.clone(),
    };

    webhooks::process_payment_event(&state.pool, &event).await?;

    Ok(())
}
