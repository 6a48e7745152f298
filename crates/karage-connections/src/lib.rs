// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Karage Connections - External API clients
//!
//! One client per third-party integration, each wrapping that provider's
//! REST API, JSON schema, and auth convention:
//!
//! | Client | Provider | Auth |
//! |--------|----------|------|
//! | [`loyalty::LoyaltyClient`] | Loyalty cards | `X-Api-Key` header |
//! | [`installments::InstallmentsClient`] | Installment payments | HTTP Basic |
//! | [`esign::EsignClient`] | E-signature | Static bearer token |
//! | [`sms::SmsClient`] | SMS/OTP | `X-Api-Key` header |
//! | [`uom::UomClient`] | Unit-of-measure sync | Cached OAuth bearer token |
//! | [`identity::IdentityClient`] | Session validation | None (trusted upstream) |
//!
//! Clients that register local entities with a provider implement the
//! [`provider::ExternalRegistrar`] capability, which is what the mapping
//! registry's creator callbacks are built from.
//!
//! Failures are typed: [`error::GatewayError::Upstream`] carries the
//! provider's error payload so handlers can attach it to their responses.
//! No client retries, with one exception: [`uom::UomClient`] refreshes its
//! cached token and retries once when the provider rejects it.

#![deny(missing_docs)]

/// Error types for gateway calls.
pub mod error;

/// E-signature provider client.
pub mod esign;

/// Upstream identity API client for session validation.
pub mod identity;

/// Installment payment provider client.
pub mod installments;

/// Loyalty card provider client.
pub mod loyalty;

/// Common capability interface for provider clients.
pub mod provider;

/// SMS/OTP provider client.
pub mod sms;

/// Injectable bearer-token cache.
pub mod token_cache;

/// Unit-of-measure sync provider client.
pub mod uom;

pub use error::GatewayError;
pub use provider::ExternalRegistrar;
pub use token_cache::TokenCache;
