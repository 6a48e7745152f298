// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! External-ID mapping registry.
//!
//! Every integration keeps one mapping table associating a local entity ID
//! (scoped to a location) with the identifier the external system assigned.
//! The tables share one shape and one invariant: at most one row per
//! `(local_id, location_id)` pair, enforced by a unique constraint. Writes
//! go through an atomic `ON CONFLICT` upsert, so two concurrent requests for
//! the same pair cannot insert duplicates.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

/// Which integration's mapping table to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// Loyalty card numbers for customers.
    LoyaltyCard,
    /// Unit-of-measure provider IDs for units.
    Unit,
    /// Unit-of-measure provider IDs for suppliers.
    Supplier,
    /// Unit-of-measure provider IDs for categories.
    Category,
    /// Unit-of-measure provider IDs for products.
    Product,
    /// Installment provider payment IDs for checkouts.
    Bill,
}

impl MappingKind {
    /// Table name backing this mapping kind.
    ///
    /// Static strings only; kind never comes from user input unchecked.
    pub fn table(&self) -> &'static str {
        match self {
            Self::LoyaltyCard => "loyalty_card_mappings",
            Self::Unit => "unit_mappings",
            Self::Supplier => "supplier_mappings",
            Self::Category => "category_mappings",
            Self::Product => "product_mappings",
            Self::Bill => "bill_mappings",
        }
    }
}

impl std::fmt::Display for MappingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LoyaltyCard => "loyalty_card",
            Self::Unit => "unit",
            Self::Supplier => "supplier",
            Self::Category => "category",
            Self::Product => "product",
            Self::Bill => "bill",
        };
        write!(f, "{}", name)
    }
}

/// One external-ID mapping row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExternalMapping {
    /// Local entity ID.
    pub local_id: i64,
    /// Location scope.
    pub location_id: i64,
    /// Identifier assigned by the external system.
    pub external_id: String,
    /// When the mapping was first created.
    pub created_at: DateTime<Utc>,
    /// When the mapping was last overwritten by a sync, if ever.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Error from [`MappingRegistry::resolve_or_create`].
///
/// Distinguishes store failures from failures of the caller-supplied
/// creator so handlers can map them to different responses.
#[derive(Debug, Error)]
pub enum ResolveError<E>
where
    E: std::error::Error,
{
    /// The mapping table read or write failed.
    #[error("Mapping store error: {0}")]
    Store(#[from] sqlx::Error),
    /// The creator callback (the external API call) failed.
    #[error(transparent)]
    Creator(E),
}

/// Registry client for the per-integration mapping tables.
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    pool: PgPool,
}

impl MappingRegistry {
    /// Create a new registry client.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the mapping for `(local_id, location_id)`, if one exists.
    pub async fn get(
        &self,
        kind: MappingKind,
        local_id: i64,
        location_id: i64,
    ) -> Result<Option<ExternalMapping>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT local_id, location_id, external_id, created_at, updated_at
            FROM {}
            WHERE local_id = $1 AND location_id = $2
            "#,
            kind.table()
        );

        sqlx::query_as::<_, ExternalMapping>(&query)
            .bind(local_id)
            .bind(location_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Insert or overwrite the mapping for `(local_id, location_id)`.
    ///
    /// Atomic: the unique constraint plus `ON CONFLICT` closes the
    /// check-then-insert window, so concurrent writers converge on one row.
    pub async fn upsert(
        &self,
        kind: MappingKind,
        local_id: i64,
        location_id: i64,
        external_id: &str,
    ) -> Result<ExternalMapping, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO {} (local_id, location_id, external_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (local_id, location_id) DO UPDATE SET
                external_id = EXCLUDED.external_id,
                updated_at = NOW()
            RETURNING local_id, location_id, external_id, created_at, updated_at
            "#,
            kind.table()
        );

        sqlx::query_as::<_, ExternalMapping>(&query)
            .bind(local_id)
            .bind(location_id)
            .bind(external_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Resolve the external ID for `(local_id, location_id)`, creating it
    /// through `creator` on first use.
    ///
    /// An existing mapping is returned unchanged with no re-validation
    /// against the external system. When absent, `creator` performs the
    /// external call; its result is persisted and returned. A creator
    /// failure surfaces to the caller and writes nothing.
    pub async fn resolve_or_create<E, F, Fut>(
        &self,
        kind: MappingKind,
        local_id: i64,
        location_id: i64,
        creator: F,
    ) -> Result<String, ResolveError<E>>
    where
        E: std::error::Error,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(existing) = self.get(kind, local_id, location_id).await? {
            tracing::debug!(
                kind = %kind,
                local_id,
                location_id,
                external_id = %existing.external_id,
                "Resolved existing mapping"
            );
            return Ok(existing.external_id);
        }

        let external_id = creator().await.map_err(ResolveError::Creator)?;

        let mapping = self
            .upsert(kind, local_id, location_id, &external_id)
            .await?;

        tracing::info!(
            kind = %kind,
            local_id,
            location_id,
            external_id = %mapping.external_id,
            "Created mapping"
        );

        Ok(mapping.external_id)
    }
}
