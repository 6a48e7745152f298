// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for karage-core integration tests.
//!
//! Tests run against a real PostgreSQL pointed to by
//! `TEST_KARAGE_DATABASE_URL` and are skipped when it is not set. Each
//! test works in its own freshly-generated location scope so the suite is
//! safe under the parallel test runner and across repeated runs.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;

static SCOPE_COUNTER: AtomicI64 = AtomicI64::new(0);

/// A location ID unique across tests and test runs.
pub fn fresh_scope() -> i64 {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_micros() as i64;
    micros + SCOPE_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test context holding a migrated database pool.
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database and apply migrations.
    pub async fn new() -> Result<Self, String> {
        let database_url = std::env::var("TEST_KARAGE_DATABASE_URL")
            .map_err(|_| "TEST_KARAGE_DATABASE_URL not set")?;

        let pool = PgPool::connect(&database_url)
            .await
            .map_err(|e| format!("Failed to connect to database: {}", e))?;

        karage_core::migrations::run(&pool)
            .await
            .map_err(|e| format!("Failed to run migrations: {}", e))?;

        Ok(Self { pool })
    }

    /// Insert a test checkout and return its ID.
    pub async fn create_checkout(&self, location_id: i64, total_amount: i64) -> i64 {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO checkouts (location_id, total_amount, status)
            VALUES ($1, $2, 'open')
            RETURNING checkout_id
            "#,
        )
        .bind(location_id)
        .bind(total_amount)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create test checkout");
        row.0
    }

}
