// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Webhook records for inbound third-party notifications.
//!
//! Payment notifications are keyed by the provider's payment ID: posting the
//! same ID twice updates the existing row. The status propagation to the
//! checkout runs in the same database transaction as the record upsert, so a
//! failed step leaves no partial update behind.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::{CoreError, Result};

/// Inbound payment notification, stored by natural key.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentNotification {
    /// Provider-assigned payment ID (natural key, unique).
    pub payment_id: String,
    /// Local checkout the payment refers to, when the provider sent one.
    pub checkout_id: Option<i64>,
    /// Provider-reported payment status.
    pub status: String,
    /// Payment amount in minor units, when reported.
    pub amount: Option<i64>,
    /// Number of installments, when reported.
    pub installment_count: Option<i32>,
    /// Raw notification payload as received.
    pub raw_payload: serde_json::Value,
    /// When the first notification for this payment arrived.
    pub received_at: DateTime<Utc>,
    /// When a later notification last updated the row, if ever.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields extracted from an inbound payment event.
#[derive(Debug, Clone)]
pub struct PaymentEvent {
    /// Provider-assigned payment ID.
    pub payment_id: String,
    /// Local checkout the payment refers to.
    pub checkout_id: Option<i64>,
    /// Provider-reported payment status.
    pub status: String,
    /// Payment amount in minor units.
    pub amount: Option<i64>,
    /// Number of installments.
    pub installment_count: Option<i32>,
    /// Raw notification payload as received.
    pub raw_payload: serde_json::Value,
}

/// Map a provider payment status onto a checkout status.
fn checkout_status_for(payment_status: &str) -> Option<&'static str> {
    match payment_status {
        "approved" | "completed" => Some("paid"),
        "pending" => Some("pending_payment"),
        "rejected" | "failed" => Some("failed"),
        "cancelled" => Some("cancelled"),
        _ => None,
    }
}

/// Process a payment notification in one transaction.
///
/// Upserts the notification row by `payment_id`, then propagates the status
/// to the referenced checkout. Any failure rolls the whole transaction back:
/// either both tables reflect the event or neither does.
pub async fn process_payment_event(pool: &PgPool, event: &PaymentEvent) -> Result<()> {
    let mut tx = pool.begin().await?;

    let row: (Option<i64>,) = sqlx::query_as(
        r#"
        INSERT INTO payment_notifications
            (payment_id, checkout_id, status, amount, installment_count, raw_payload, received_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        ON CONFLICT (payment_id) DO UPDATE SET
            checkout_id = COALESCE(EXCLUDED.checkout_id, payment_notifications.checkout_id),
            status = EXCLUDED.status,
            amount = COALESCE(EXCLUDED.amount, payment_notifications.amount),
            installment_count = COALESCE(EXCLUDED.installment_count, payment_notifications.installment_count),
            raw_payload = EXCLUDED.raw_payload,
            updated_at = NOW()
        RETURNING checkout_id
        "#,
    )
    .bind(&event.payment_id)
    .bind(event.checkout_id)
    .bind(&event.status)
    .bind(event.amount)
    .bind(event.installment_count)
    .bind(&event.raw_payload)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(checkout_id) = row.0 {
        if let Some(checkout_status) = checkout_status_for(&event.status) {
            let result = sqlx::query(
                r#"
                UPDATE checkouts
                SET status = $2
                WHERE checkout_id = $1
                "#,
            )
            .bind(checkout_id)
            .bind(checkout_status)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back the notification upsert.
                return Err(CoreError::CheckoutNotFound(checkout_id));
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        payment_id = %event.payment_id,
        status = %event.status,
        checkout_id = ?row.0,
        "Processed payment notification"
    );

    Ok(())
}

/// Get a payment notification by its natural key.
pub async fn get_payment_notification(
    pool: &PgPool,
    payment_id: &str,
) -> Result<Option<PaymentNotification>> {
    let row = sqlx::query_as::<_, PaymentNotification>(
        r#"
        SELECT payment_id, checkout_id, status, amount, installment_count,
               raw_payload, received_at, updated_at
        FROM payment_notifications
        WHERE payment_id = $1
        "#,
    )
    .bind(payment_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Record the install/uninstall state of a loyalty card.
///
/// Keyed by card number; a repeated event updates the existing row.
pub async fn upsert_card_state(pool: &PgPool, card_no: &str, state: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO loyalty_card_states (card_no, state, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (card_no) DO UPDATE SET
            state = EXCLUDED.state,
            updated_at = NOW()
        "#,
    )
    .bind(card_no)
    .bind(state)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_statuses_map_to_checkout_statuses() {
        assert_eq!(checkout_status_for("approved"), Some("paid"));
        assert_eq!(checkout_status_for("completed"), Some("paid"));
        assert_eq!(checkout_status_for("pending"), Some("pending_payment"));
        assert_eq!(checkout_status_for("rejected"), Some("failed"));
        assert_eq!(checkout_status_for("cancelled"), Some("cancelled"));
        assert_eq!(checkout_status_for("unknown-status"), None);
    }
}
