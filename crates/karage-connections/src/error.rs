// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for external gateway clients.

use thiserror::Error;

/// Errors from external gateway calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    ///
    /// Carries the upstream error payload so handlers can attach it to
    /// their own error response.
    #[error("Upstream error ({status})")]
    Upstream {
        /// HTTP status the provider returned.
        status: u16,
        /// Upstream response body, parsed as JSON when possible.
        body: serde_json::Value,
    },

    /// Token acquisition or session validation was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider answered 2xx but the payload was not the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type using [`GatewayError`].
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Build an [`GatewayError::Upstream`] from a non-success response,
/// preserving the provider's error payload.
pub(crate) async fn upstream_error(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
    GatewayError::Upstream { status, body }
}
