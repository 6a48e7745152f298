// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common capability interface for provider clients.

use async_trait::async_trait;

use crate::error::Result;

/// A provider client that can register one kind of local entity with an
/// external system and return the ID that system assigned.
///
/// Providers are expected to be idempotent at their own discretion; the
/// mapping registry in karage-core guarantees each entity is registered at
/// most once per location as long as the first call succeeds.
#[async_trait]
pub trait ExternalRegistrar<E>: Send + Sync {
    /// Create the entity on the provider side (or fetch the existing one,
    /// when the provider deduplicates) and return its external ID.
    async fn create_or_fetch(&self, entity: &E) -> Result<String>;
}
