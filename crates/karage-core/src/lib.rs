// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Karage Core - Persistence for the integration backend
//!
//! This crate owns the PostgreSQL layer shared by every karage endpoint:
//! domain tables (users, customers, items, checkouts), the per-integration
//! external-ID mapping tables, and webhook records for inbound payment and
//! loyalty notifications.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      karage-server                          │
//! │              (HTTP handlers, credential checks)             │
//! └─────────────────────────────────────────────────────────────┘
//!                │                │                  │
//!                ▼                ▼                  ▼
//!       ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//!       │  db (domain  │  │   mapping    │  │   webhooks   │
//!       │   queries)   │  │  (registry)  │  │  (records)   │
//!       └──────────────┘  └──────────────┘  └──────────────┘
//!                │                │                  │
//!                ▼                ▼                  ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PostgreSQL                           │
//! │   (users, customers, items, checkouts, *_mappings,          │
//! │    payment_notifications, loyalty_card_states)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # External-ID Mappings
//!
//! Each third-party integration keeps one mapping table associating a local
//! entity ID (scoped to a location) with the identifier the external system
//! assigned. At most one mapping exists per `(local_id, location_id)` pair,
//! enforced by a unique constraint and `ON CONFLICT` upserts. Mappings are
//! created on the first successful external call, updated in place when a
//! later sync observes a different external value, and never deleted.
//!
//! # Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `KARAGE_DATABASE_URL` | Yes | - | PostgreSQL connection string |
//! | `KARAGE_HTTP_PORT` | No | `8080` | HTTP API port |
//! | `KARAGE_EVENT_SECRET` | Yes | - | Shared secret for webhook endpoints |
//! | `KARAGE_JWT_SECRET` | Yes | - | HMAC secret for signed callback tokens |
//! | `KARAGE_JWT_ISSUER` | No | `karage` | Required issuer claim |
//! | `KARAGE_IDENTITY_API_URL` | Yes | - | Upstream identity API base URL |
//! | `KARAGE_LOYALTY_API_URL` / `_API_KEY` | Yes | - | Loyalty card provider |
//! | `KARAGE_INSTALLMENTS_API_URL` / `_USER` / `_PASSWORD` | Yes | - | Installment payment provider |
//! | `KARAGE_ESIGN_API_URL` / `_TOKEN` | Yes | - | E-signature provider |
//! | `KARAGE_SMS_API_URL` / `_API_KEY` | Yes | - | SMS/OTP provider |
//! | `KARAGE_UOM_API_URL` / `_CLIENT_ID` / `_CLIENT_SECRET` | Yes | - | Unit-of-measure sync provider |
//!
//! # Modules
//!
//! - [`config`]: Configuration from environment variables
//! - [`db`]: Domain table queries (users, customers, items, checkouts)
//! - [`error`]: Error types for core operations
//! - [`mapping`]: External-ID mapping registry
//! - [`migrations`]: Embedded database migrations
//! - [`webhooks`]: Payment notification and loyalty card state records

#![deny(missing_docs)]

/// Configuration loaded from environment variables.
pub mod config;

/// PostgreSQL queries for domain tables.
pub mod db;

/// Error types for core operations.
pub mod error;

/// External-ID mapping registry with idempotent resolve-or-create.
pub mod mapping;

/// Embedded database migrations.
pub mod migrations;

/// Webhook records: payment notifications and loyalty card states.
pub mod webhooks;

pub use config::Config;
pub use error::{CoreError, Result};
pub use mapping::{MappingKind, MappingRegistry};
