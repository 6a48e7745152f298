// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! E-signature provider client.
//!
//! Authenticates with a static bearer token and opens signature envelopes
//! for checkout documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, upstream_error};
use crate::provider::ExternalRegistrar;

/// Document details sent to the e-signature provider.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureDocument {
    /// Local checkout ID the document belongs to.
    pub reference: i64,
    /// Human-readable document name shown to the signer.
    pub document_name: String,
}

#[derive(Debug, Deserialize)]
struct CreateEnvelopeResponse {
    envelope_id: String,
}

/// Client for the e-signature provider.
#[derive(Debug)]
pub struct EsignClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl EsignClient {
    /// Create a new e-signature client.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Open a signature envelope and return its provider ID.
    pub async fn create_envelope(&self, document: &SignatureDocument) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/envelopes", self.base_url))
            .bearer_auth(&self.token)
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: CreateEnvelopeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("esign payload: {}", e)))?;

        tracing::info!(
            reference = document.reference,
            envelope_id = %payload.envelope_id,
            "Opened signature envelope"
        );

        Ok(payload.envelope_id)
    }
}

#[async_trait]
impl ExternalRegistrar<SignatureDocument> for EsignClient {
    async fn create_or_fetch(&self, entity: &SignatureDocument) -> Result<String> {
        self.create_envelope(entity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_envelope_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/envelopes"))
            .and(header("authorization", "Bearer esign-token"))
            .and(body_partial_json(json!({"reference": 8})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"envelope_id": "ENV-8"})),
            )
            .mount(&server)
            .await;

        let client = EsignClient::new(server.uri(), "esign-token");
        let envelope_id = client
            .create_envelope(&SignatureDocument {
                reference: 8,
                document_name: "Sales contract".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(envelope_id, "ENV-8");
    }

    #[tokio::test]
    async fn malformed_payload_is_an_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/envelopes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let client = EsignClient::new(server.uri(), "esign-token");
        let err = client
            .create_envelope(&SignatureDocument {
                reference: 8,
                document_name: "Sales contract".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }
}
