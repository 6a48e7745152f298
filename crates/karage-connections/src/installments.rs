// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Installment payment provider client.
//!
//! Authenticates with HTTP Basic auth. Creates an installment checkout for
//! a local order and can fetch the provider-side payment status.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, upstream_error};
use crate::provider::ExternalRegistrar;

/// Order details sent to the installment provider.
#[derive(Debug, Clone, Serialize)]
pub struct InstallmentOrder {
    /// Local checkout ID, forwarded as the provider reference.
    pub reference: i64,
    /// Total amount in minor currency units.
    pub amount: i64,
    /// Requested number of installments.
    pub installment_count: i32,
}

#[derive(Debug, Deserialize)]
struct CreateCheckoutResponse {
    payment_id: String,
}

#[derive(Debug, Deserialize)]
struct PaymentStatusResponse {
    status: String,
}

/// Client for the installment payment provider.
#[derive(Debug)]
pub struct InstallmentsClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl InstallmentsClient {
    /// Create a new installments client.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create an installment checkout and return the provider payment ID.
    pub async fn create_checkout(&self, order: &InstallmentOrder) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/checkouts", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(order)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: CreateCheckoutResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("installments payload: {}", e)))?;

        tracing::info!(
            reference = order.reference,
            payment_id = %payload.payment_id,
            "Created installment checkout"
        );

        Ok(payload.payment_id)
    }

    /// Fetch the provider-side status of a payment.
    pub async fn get_payment_status(&self, payment_id: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/payments/{}", self.base_url, payment_id))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: PaymentStatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("installments payload: {}", e)))?;

        Ok(payload.status)
    }
}

#[async_trait]
impl ExternalRegistrar<InstallmentOrder> for InstallmentsClient {
    async fn create_or_fetch(&self, entity: &InstallmentOrder) -> Result<String> {
        self.create_checkout(entity).await
    }
}
