// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! API error types.
//!
//! Every handler failure becomes a structured JSON body with the matching
//! HTTP status. Upstream provider rejections keep the provider's payload
//! under `upstream` so the caller can see what the provider said; internal
//! details are logged, never leaked.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use karage_connections::GatewayError;
use karage_core::CoreError;
use karage_core::mapping::ResolveError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Upstream provider error payload, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<serde_json::Value>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client sent a malformed or incomplete request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Credential missing or not matching.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A referenced domain entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An external provider rejected the call.
    #[error("upstream provider error ({status})")]
    Upstream {
        /// HTTP status the provider returned.
        status: u16,
        /// The provider's error payload.
        body: serde_json::Value,
    },

    /// Anything unexpected: database failures, transport failures, bugs.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Upstream { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            // Provider rejections surface as a client-visible 400 with the
            // provider payload attached.
            Self::Upstream { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CustomerNotFound(id) => Self::NotFound(format!("customer {}", id)),
            CoreError::ItemNotFound(id) => Self::NotFound(format!("item {}", id)),
            CoreError::CheckoutNotFound(id) => Self::NotFound(format!("checkout {}", id)),
            CoreError::SignatureRequestNotFound(id) => {
                Self::NotFound(format!("signature request {}", id))
            }
            CoreError::PaymentNotFound(id) => Self::NotFound(format!("payment {}", id)),
            CoreError::InvalidRequest(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Upstream { status, body } => Self::Upstream { status, body },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ResolveError<GatewayError>> for ApiError {
    fn from(err: ResolveError<GatewayError>) -> Self {
        match err {
            ResolveError::Store(e) => Self::Internal(e.to_string()),
            ResolveError::Creator(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details go to the log, not the wire.
        let (message, upstream) = match &self {
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "Request failed with internal error");
                ("internal error".to_string(), None)
            }
            Self::Upstream { body, .. } => (self.to_string(), Some(body.clone())),
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            code: self.code().to_string(),
            message,
            upstream,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
