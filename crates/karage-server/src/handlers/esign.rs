// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! E-signature endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use karage_connections::esign::SignatureDocument;
use karage_core::db;

use crate::auth::{self, SessionPrincipal};
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::AppState;

use super::required;

/// Request body for signature request creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSignatureRequest {
    /// Checkout the document belongs to.
    pub checkout_id: Option<i64>,
    /// Document name shown to the signer.
    pub document_name: Option<String>,
}

/// Response body for signature request creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSignatureResponse {
    /// Local signature request ID.
    pub request_id: i64,
    /// Envelope ID assigned by the provider.
    pub envelope_id: String,
    /// Request status.
    pub status: String,
}

/// POST /v1/esign/requests - Open a signature envelope for a checkout.
pub async fn create_request(
    State(state): State<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    AppJson(request): AppJson<CreateSignatureRequest>,
) -> ApiResult<Json<CreateSignatureResponse>> {
    let checkout_id = required(request.checkout_id, "CheckoutId")?;
    let document_name = required(request.document_name, "DocumentName")?;

    if document_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "DocumentName must not be empty".to_string(),
        ));
    }

    let checkout = db::get_checkout(&state.pool, checkout_id, principal.location_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("checkout {}", checkout_id)))?;

    let envelope_id = state
        .esign
        .create_envelope(&SignatureDocument {
            reference: checkout.checkout_id,
            document_name: document_name.clone(),
        })
        .await?;

    let request_id =
        db::create_signature_request(&state.pool, checkout_id, &envelope_id, &document_name)
            .await?;

    Ok(Json(CreateSignatureResponse {
        request_id,
        envelope_id,
        status: "pending".to_string(),
    }))
}

/// Query parameters for the signing callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Signed token identifying the completed request.
    pub token: Option<String>,
}

/// Response body for the signing callback.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackResponse {
    /// Completed signature request.
    pub request_id: i64,
    /// Request status.
    pub status: String,
}

/// GET /v1/esign/callback - Provider redirect after signing.
///
/// Authenticated by the signed token in the query string; the `pid` claim
/// names the signature request.
pub async fn signing_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Json<CallbackResponse>> {
    let token = params
        .token
        .ok_or_else(|| ApiError::Unauthorized("signature token required".to_string()))?;

    let pid = auth::verify_signed_token(&token, &state.auth.jwt_secret, &state.auth.jwt_issuer)?;

    let request_id: i64 = pid
        .parse()
        .map_err(|_| ApiError::Unauthorized("invalid signature token".to_string()))?;

    let updated = db::mark_signature_signed(&state.pool, request_id).await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "signature request {}",
            request_id
        )));
    }

    Ok(Json(CallbackResponse {
        request_id,
        status: "signed".to_string(),
    }))
}
