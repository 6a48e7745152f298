// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Karage Server - HTTP API for the integration backend
//!
//! Each endpoint authenticates one of four ways, reads or writes local
//! data, calls at most one external provider, and records the external ID
//! in the mapping registry.
//!
//! # Endpoints
//!
//! | Method/Path | Auth | Description |
//! |-------------|------|-------------|
//! | `GET /v1/health` | none | Liveness plus database ping |
//! | `POST /v1/loyalty/cards` | session bearer | Issue a loyalty card (idempotent) |
//! | `POST /v1/loyalty/events` | `x-event-secret` | Card install/uninstall webhook |
//! | `POST /v1/catalog/sync` | `X-API-Key` | Sync a catalog item to the provider |
//! | `POST /v1/payments/installments` | session bearer | Open an installment checkout |
//! | `POST /v1/payments/installments/events` | `x-event-secret` | Payment notification webhook |
//! | `POST /v1/esign/requests` | session bearer | Open a signature envelope |
//! | `GET /v1/esign/callback` | signed JWT in query | Mark a request signed |
//! | `POST /v1/sms/otp` | `X-API-Key` | Deliver a one-time code |
//!
//! Webhook endpoints answer 200 even when processing fails internally;
//! the failure is logged. Everything else follows standard HTTP semantics
//! with structured JSON error bodies.
//!
//! # Modules
//!
//! - [`auth`]: Credential verification (API key, session, JWT, webhook secret)
//! - [`error`]: API error type and response mapping
//! - [`extract`]: Request extractors with structured rejections
//! - [`handlers`]: Request handlers per endpoint group
//! - [`routes`]: Router assembly
//! - [`state`]: Shared application state

#![deny(missing_docs)]

/// Credential verification.
pub mod auth;

/// API error types.
pub mod error;

/// Request extractors.
pub mod extract;

/// Request handlers.
pub mod handlers;

/// Route configuration.
pub mod routes;

/// Shared application state.
pub mod state;

pub use routes::create_router;
pub use state::AppState;
