// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! API tests for the installment payment endpoints.

mod common;

use axum::http::StatusCode;
use common::{EVENT_SECRET, TestContext, fresh_location};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Skip test if database URL is not set
macro_rules! skip_if_no_db {
    () => {
        if std::env::var("TEST_KARAGE_DATABASE_URL").is_err() {
            eprintln!("Skipping test: TEST_KARAGE_DATABASE_URL not set");
            return;
        }
    };
}

#[tokio::test]
async fn installment_count_is_validated_before_any_call() {
    skip_if_no_db!();
    let ctx = TestContext::new().await.expect("test context");

    let location = fresh_location();
    let user_id = ctx.create_user("PAYVAL", "key-payval", location).await;
    ctx.accept_session(user_id, location, "PAYVAL", "KG-PAYVAL-t1")
        .await;
    let checkout_id = ctx.create_checkout(location, 48000).await;

    Mock::given(method("POST"))
        .and(path("/checkouts"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.installments)
        .await;

    let auth = [("authorization", "Bearer KG-PAYVAL-t1")];

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/payments/installments",
            &auth,
            Some(json!({"CheckoutId": checkout_id})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("InstallmentCount")
    );

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/payments/installments",
            &auth,
            Some(json!({"CheckoutId": checkout_id, "InstallmentCount": 48})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn installment_checkout_registers_bill_mapping_once() {
    skip_if_no_db!();
    let ctx = TestContext::new().await.expect("test context");

    let location = fresh_location();
    let user_id = ctx.create_user("PAYBILL", "key-paybill", location).await;
    ctx.accept_session(user_id, location, "PAYBILL", "KG-PAYBILL-t1")
        .await;
    let checkout_id = ctx.create_checkout(location, 129000).await;

    Mock::given(method("POST"))
        .and(path("/checkouts"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"payment_id": "PAY-BILL-1"})),
        )
        .expect(1)
        .mount(&ctx.installments)
        .await;

    let auth = [("authorization", "Bearer KG-PAYBILL-t1")];
    let request = json!({"CheckoutId": checkout_id, "InstallmentCount": 6});

    let (status, body) = ctx
        .send("POST", "/v1/payments/installments", &auth, Some(request.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["PaymentId"], "PAY-BILL-1");

    // Replay resolves the existing bill mapping without a provider call.
    let (status, body) = ctx
        .send("POST", "/v1/payments/installments", &auth, Some(request))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["PaymentId"], "PAY-BILL-1");
}

#[tokio::test]
async fn payment_event_upserts_by_natural_key() {
    skip_if_no_db!();
    let ctx = TestContext::new().await.expect("test context");

    let location = fresh_location();
    let checkout_id = ctx.create_checkout(location, 60000).await;
    let auth = [("x-event-secret", EVENT_SECRET)];
    let payment_id = format!("PAY-EVT-{}", location);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/payments/installments/events",
            &auth,
            Some(json!({
                "PaymentId": payment_id,
                "Status": "pending",
                "CheckoutId": checkout_id,
                "Amount": 60000,
                "InstallmentCount": 6
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/payments/installments/events",
            &auth,
            Some(json!({
                "PaymentId": payment_id,
                "Status": "approved",
                "CheckoutId": checkout_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let row: (String, i64) = sqlx::query_as(
        "SELECT status, (SELECT COUNT(*) FROM payment_notifications WHERE payment_id = $1) \
         FROM payment_notifications WHERE payment_id = $1",
    )
    .bind(&payment_id)
    .fetch_one(&ctx.pool)
    .await
    .expect("notification row");
    assert_eq!(row.0, "approved");
    assert_eq!(row.1, 1);

    let checkout_status: (String,) =
        sqlx::query_as("SELECT status FROM checkouts WHERE checkout_id = $1")
            .bind(checkout_id)
            .fetch_one(&ctx.pool)
            .await
            .expect("checkout status");
    assert_eq!(checkout_status.0, "paid");
}

#[tokio::test]
async fn payment_event_answers_200_when_processing_fails() {
    skip_if_no_db!();
    let ctx = TestContext::new().await.expect("test context");

    let payment_id = format!("PAY-FAIL-{}", fresh_location());

    // Checkout 999999999 does not exist, so processing rolls back.
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/payments/installments/events",
            &[("x-event-secret", EVENT_SECRET)],
            Some(json!({
                "PaymentId": payment_id,
                "Status": "approved",
                "CheckoutId": 999999999i64
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);

    // The rolled-back upsert left nothing behind.
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM payment_notifications WHERE payment_id = $1")
            .bind(&payment_id)
            .fetch_one(&ctx.pool)
            .await
            .expect("notification count");
    assert_eq!(count.0, 0);
}

#[tokio::test]
async fn payment_event_requires_the_shared_secret() {
    skip_if_no_db!();
    let ctx = TestContext::new().await.expect("test context");

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/payments/installments/events",
            &[],
            Some(json!({"PaymentId": "PAY-X", "Status": "approved"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
