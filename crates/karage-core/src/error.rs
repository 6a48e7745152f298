// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for karage-core.

use thiserror::Error;

/// Core persistence errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Customer was not found in the caller's location.
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// Catalog item was not found in the caller's location.
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Checkout was not found in the caller's location.
    #[error("Checkout not found: {0}")]
    CheckoutNotFound(i64),

    /// Signature request was not found.
    #[error("Signature request not found: {0}")]
    SignatureRequestNotFound(i64),

    /// Payment notification was not found by its natural key.
    #[error("Payment notification not found: {0}")]
    PaymentNotFound(String),

    /// Request validation failed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
