// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SMS/OTP endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use karage_connections::sms::{OtpMessage, normalize_phone};

use crate::auth::ApiKeyPrincipal;
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::AppState;

use super::required;

/// Request body for OTP delivery.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendOtpRequest {
    /// Destination phone number.
    pub phone: Option<String>,
    /// One-time code to deliver.
    pub code: Option<String>,
}

/// Response body for OTP delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendOtpResponse {
    /// Message ID assigned by the SMS provider.
    pub message_id: String,
}

/// POST /v1/sms/otp - Deliver a one-time code by SMS.
pub async fn send_otp(
    State(state): State<AppState>,
    ApiKeyPrincipal(_principal): ApiKeyPrincipal,
    AppJson(request): AppJson<SendOtpRequest>,
) -> ApiResult<Json<SendOtpResponse>> {
    let phone = required(request.phone, "Phone")?;
    let code = required(request.code, "Code")?;

    let phone = normalize_phone(&phone)
        .ok_or_else(|| ApiError::BadRequest("Phone is not a valid number".to_string()))?;

    if code.is_empty() {
        return Err(ApiError::BadRequest("Code must not be empty".to_string()));
    }

    let message_id = state.sms.send_otp(&OtpMessage { phone, code }).await?;

    Ok(Json(SendOtpResponse { message_id }))
}
