// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Loyalty card provider client.
//!
//! Authenticates with a static API key header and creates digital wallet
//! cards for customers. The provider assigns the card number.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, upstream_error};
use crate::provider::ExternalRegistrar;

/// Customer details sent to the loyalty provider.
#[derive(Debug, Clone, Serialize)]
pub struct CardholderProfile {
    /// Local customer ID, forwarded as the provider's external reference.
    pub customer_id: i64,
    /// Customer display name.
    pub name: String,
    /// Phone number, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateCardResponse {
    card_no: String,
}

/// Client for the loyalty card provider.
#[derive(Debug)]
pub struct LoyaltyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LoyaltyClient {
    /// Create a new loyalty client.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a loyalty card for a customer and return the card number.
    pub async fn create_card(&self, profile: &CardholderProfile) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/cards", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .json(profile)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: CreateCardResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("loyalty payload: {}", e)))?;

        tracing::info!(
            customer_id = profile.customer_id,
            card_no = %payload.card_no,
            "Created loyalty card"
        );

        Ok(payload.card_no)
    }
}

#[async_trait]
impl ExternalRegistrar<CardholderProfile> for LoyaltyClient {
    async fn create_or_fetch(&self, entity: &CardholderProfile) -> Result<String> {
        self.create_card(entity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_card_sends_api_key_and_returns_card_no() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cards"))
            .and(header("X-Api-Key", "secret-key"))
            .and(body_partial_json(json!({"customer_id": 42, "name": "Jan"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"card_no": "CARD-42"})))
            .mount(&server)
            .await;

        let client = LoyaltyClient::new(server.uri(), "secret-key");
        let card_no = client
            .create_card(&CardholderProfile {
                customer_id: 42,
                name: "Jan".to_string(),
                phone: None,
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(card_no, "CARD-42");
    }

    #[tokio::test]
    async fn provider_error_carries_upstream_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cards"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({"message": "phone required"})),
            )
            .mount(&server)
            .await;

        let client = LoyaltyClient::new(server.uri(), "secret-key");
        let err = client
            .create_card(&CardholderProfile {
                customer_id: 1,
                name: "X".to_string(),
                phone: None,
                email: None,
            })
            .await
            .unwrap_err();

        match err {
            GatewayError::Upstream { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body["message"], "phone required");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
