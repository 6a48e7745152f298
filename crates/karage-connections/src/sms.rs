// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SMS/OTP provider client.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, upstream_error};

/// One-time-password message to deliver.
#[derive(Debug, Clone, Serialize)]
pub struct OtpMessage {
    /// Normalized destination phone number.
    pub phone: String,
    /// One-time code to embed in the message body.
    pub code: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    message_id: String,
}

/// Normalize a phone number for the SMS provider.
///
/// Strips spaces and dashes; accepts an optional leading `+` followed by
/// digits only. Returns `None` for anything else.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(cleaned)
}

/// Client for the SMS/OTP provider.
#[derive(Debug)]
pub struct SmsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SmsClient {
    /// Create a new SMS client.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Send an OTP message and return the provider message ID.
    pub async fn send_otp(&self, message: &OtpMessage) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: SendResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("sms payload: {}", e)))?;

        tracing::info!(message_id = %payload.message_id, "Sent OTP message");

        Ok(payload.message_id)
    }
}
