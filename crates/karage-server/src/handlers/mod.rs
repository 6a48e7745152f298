// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP request handlers.
//!
//! Every handler validates presence of all business-required fields before
//! any side effect, performs at most one local read and one external call
//! per logical operation, and returns a structured JSON error body with
//! the appropriate status. Webhook handlers return 200 even when internal
//! processing fails, to keep the upstream from retry-storming us.

use crate::error::ApiError;

/// Catalog sync endpoints.
pub mod catalog;

/// E-signature endpoints.
pub mod esign;

/// Health check endpoint.
pub mod health;

/// Loyalty card endpoints.
pub mod loyalty;

/// Installment payment endpoints.
pub mod payments;

/// SMS/OTP endpoint.
pub mod sms;

/// Unwrap a required request field or fail with a descriptive 400.
pub(crate) fn required<T>(field: Option<T>, name: &'static str) -> Result<T, ApiError> {
    field.ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))
}
