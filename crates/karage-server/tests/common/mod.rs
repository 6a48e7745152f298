// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for karage-server API tests.
//!
//! Builds the full application state against a real PostgreSQL
//! (`TEST_KARAGE_DATABASE_URL`) with every external provider replaced by a
//! wiremock server. Requests are driven through the router in-process.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use karage_core::config::{AuthConfig, Config, ProviderConfig};
use karage_server::{AppState, create_router};

/// Shared webhook secret used by the test configuration.
pub const EVENT_SECRET: &str = "evt-secret";

/// Shared JWT secret used by the test configuration.
pub const JWT_SECRET: &str = "jwt-secret";

/// Issuer expected on signed callback tokens.
pub const JWT_ISSUER: &str = "karage";

static LOCATION_COUNTER: AtomicI64 = AtomicI64::new(0);

/// A location ID unique across tests and test runs.
pub fn fresh_location() -> i64 {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_micros() as i64;
    micros + LOCATION_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test context with a migrated database and mocked providers.
pub struct TestContext {
    pub pool: PgPool,
    pub router: Router,
    pub state: AppState,
    pub identity: MockServer,
    pub loyalty: MockServer,
    pub installments: MockServer,
    pub esign: MockServer,
    pub sms: MockServer,
    pub uom: MockServer,
}

impl TestContext {
    /// Create a new test context.
    pub async fn new() -> Result<Self, String> {
        let database_url = std::env::var("TEST_KARAGE_DATABASE_URL")
            .map_err(|_| "TEST_KARAGE_DATABASE_URL not set")?;

        let pool = PgPool::connect(&database_url)
            .await
            .map_err(|e| format!("Failed to connect to database: {}", e))?;

        karage_core::migrations::run(&pool)
            .await
            .map_err(|e| format!("Failed to run migrations: {}", e))?;

        let identity = MockServer::start().await;
        let loyalty = MockServer::start().await;
        let installments = MockServer::start().await;
        let esign = MockServer::start().await;
        let sms = MockServer::start().await;
        let uom = MockServer::start().await;

        let config = Config {
            database_url,
            http_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            auth: AuthConfig {
                event_secret: EVENT_SECRET.to_string(),
                jwt_secret: JWT_SECRET.to_string(),
                jwt_issuer: JWT_ISSUER.to_string(),
                identity_api_url: identity.uri(),
            },
            providers: ProviderConfig {
                loyalty_api_url: loyalty.uri(),
                loyalty_api_key: "loyalty-key".to_string(),
                installments_api_url: installments.uri(),
                installments_user: "merchant".to_string(),
                installments_password: "pass".to_string(),
                esign_api_url: esign.uri(),
                esign_token: "esign-token".to_string(),
                sms_api_url: sms.uri(),
                sms_api_key: "sms-key".to_string(),
                uom_api_url: uom.uri(),
                uom_client_id: "uom-cid".to_string(),
                uom_client_secret: "uom-secret".to_string(),
            },
        };

        let state = AppState::new(&config, pool.clone());
        let router = create_router(state.clone());

        Ok(Self {
            pool,
            router,
            state,
            identity,
            loyalty,
            installments,
            esign,
            sms,
            uom,
        })
    }

    /// Upsert a test user and return its ID. Rerunnable across test runs.
    pub async fn create_user(&self, company_code: &str, api_key: &str, location_id: i64) -> i64 {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (company_code, api_key, status, location_id)
            VALUES ($1, $2, 'active', $3)
            ON CONFLICT (company_code) DO UPDATE SET
                api_key = EXCLUDED.api_key,
                status = 'active',
                location_id = EXCLUDED.location_id
            RETURNING user_id
            "#,
        )
        .bind(company_code)
        .bind(api_key)
        .bind(location_id)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create test user");
        row.0
    }

    /// Insert a test customer and return its ID.
    pub async fn create_customer(&self, location_id: i64, name: &str) -> i64 {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO customers (location_id, name, phone, email)
            VALUES ($1, $2, '+48100200300', 'test@example.com')
            RETURNING customer_id
            "#,
        )
        .bind(location_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create test customer");
        row.0
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

    /// Insert a test catalog item and return its ID.
    pub async fn create_item(&self, location_id: i64, name: &str, kind: &str) -> i64 {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO items (location_id, name, kind, payload)
            VALUES ($1, $2, $3, '{"symbol": "kg"}'::jsonb)
            RETURNING item_id
            "#,
        )
        .bind(location_id)
        .bind(name)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create test item");
        row.0
    }

    /// Mount an identity mock accepting `token` as a live session.
    pub async fn accept_session(
        &self,
        user_id: i64,
        location_id: i64,
        company_code: &str,
        token: &str,
    ) {
        Mock::given(method("POST"))
            .and(path("/v1/sessions/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "sessions": [{
                    "token": token,
                    "user_id": user_id,
                    "location_id": location_id,
                    "company_code": company_code
                }]
            })))
            .mount(&self.identity)
            .await;
    }

    /// Send a request through the router and decode the JSON response.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("body")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body bytes")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
