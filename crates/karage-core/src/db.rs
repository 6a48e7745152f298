// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Domain table queries for the karage integration backend.
//!
//! All reads are scoped: handlers look entities up by ID *and* the caller's
//! location, so a principal can never act on another location's rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Integration user record.
///
/// Users are the principals behind API-key and session authentication.
/// Each user belongs to one company (unique `company_code`) and one location.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for the user.
    pub user_id: i64,
    /// Company code embedded in session tokens (unique, uppercase).
    pub company_code: String,
    /// Per-user API key secret.
    pub api_key: String,
    /// Account status (active, disabled).
    pub status: String,
    /// Location this user operates.
    pub location_id: i64,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Customer record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    /// Unique identifier for the customer.
    pub customer_id: i64,
    /// Location that owns this customer.
    pub location_id: i64,
    /// Customer display name.
    pub name: String,
    /// Phone number, if known.
    pub phone: Option<String>,
    /// Email address, if known.
    pub email: Option<String>,
}

/// Catalog item record (unit, supplier, category, or product).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Item {
    /// Unique identifier for the item.
    pub item_id: i64,
    /// Location that owns this item.
    pub location_id: i64,
    /// Item display name.
    pub name: String,
    /// Item kind (unit, supplier, category, product).
    pub kind: String,
    /// Provider-specific attributes carried as-is.
    pub payload: serde_json::Value,
}

/// Checkout (order) record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Checkout {
    /// Unique identifier for the checkout.
    pub checkout_id: i64,
    /// Location that owns this checkout.
    pub location_id: i64,
    /// Customer attached to the checkout, if any.
    pub customer_id: Option<i64>,
    /// Total amount in minor currency units.
    pub total_amount: i64,
    /// Current status (open, pending_payment, paid, failed, cancelled).
    pub status: String,
    /// When the checkout was created.
    pub created_at: DateTime<Utc>,
}

/// Check that the database answers a trivial query.
pub async fn health_check(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    Ok(row.0 == 1)
}

/// Look up an active user by its exact API key.
///
/// Disabled users never match, regardless of the key value.
pub async fn get_user_by_api_key(
    pool: &PgPool,
    api_key: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, company_code, api_key, status, location_id, created_at
        FROM users
        WHERE api_key = $1 AND status = 'active'
        "#,
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await
}

/// Look up an active user by company code.
pub async fn get_user_by_company_code(
    pool: &PgPool,
    company_code: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, company_code, api_key, status, location_id, created_at
        FROM users
        WHERE company_code = $1 AND status = 'active'
        "#,
    )
    .bind(company_code)
    .fetch_optional(pool)
    .await
}

/// Get a customer by ID within a location.
pub async fn get_customer(
    pool: &PgPool,
    customer_id: i64,
    location_id: i64,
) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        SELECT customer_id, location_id, name, phone, email
        FROM customers
        WHERE customer_id = $1 AND location_id = $2
        "#,
    )
    .bind(customer_id)
    .bind(location_id)
    .fetch_optional(pool)
    .await
}

/// Get a catalog item by ID within a location.
pub async fn get_item(
    pool: &PgPool,
    item_id: i64,
    location_id: i64,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT item_id, location_id, name, kind, payload
        FROM items
        WHERE item_id = $1 AND location_id = $2
        "#,
    )
    .bind(item_id)
    .bind(location_id)
    .fetch_optional(pool)
    .await
}

/// Get a checkout by ID within a location.
pub async fn get_checkout(
    pool: &PgPool,
    checkout_id: i64,
    location_id: i64,
) -> Result<Option<Checkout>, sqlx::Error> {
    sqlx::query_as::<_, Checkout>(
        r#"
        SELECT checkout_id, location_id, customer_id, total_amount, status, created_at
        FROM checkouts
        WHERE checkout_id = $1 AND location_id = $2
        "#,
    )
    .bind(checkout_id)
    .bind(location_id)
    .fetch_optional(pool)
    .await
}

/// Record a new e-signature request and return its ID.
pub async fn create_signature_request(
    pool: &PgPool,
    checkout_id: i64,
    envelope_id: &str,
    document_name: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO signature_requests (checkout_id, envelope_id, document_name, status, created_at)
        VALUES ($1, $2, $3, 'pending', NOW())
        RETURNING request_id
        "#,
    )
    .bind(checkout_id)
    .bind(envelope_id)
    .bind(document_name)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Mark a signature request as signed.
///
/// Returns false if no pending request with that ID exists.
pub async fn mark_signature_signed(
    pool: &PgPool,
    request_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE signature_requests
        SET status = 'signed', signed_at = NOW()
        WHERE request_id = $1 AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
