// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Upstream identity API client for session validation.
//!
//! The identity API is the authority on login sessions: credential
//! verification resolves a company code locally and then asks this API
//! whether the presented bearer token is a live session for that user.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, upstream_error};

/// Resolved session context returned by the identity API.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// User the session belongs to.
    pub user_id: i64,
    /// Location the session is scoped to.
    pub location_id: i64,
    /// Company code of the session.
    pub company_code: String,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    user_id: i64,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    status: String,
    #[serde(default)]
    sessions: Vec<LoginSession>,
}

#[derive(Debug, Deserialize)]
struct LoginSession {
    token: String,
    user_id: i64,
    location_id: i64,
    company_code: String,
}

/// Client for the upstream identity API.
#[derive(Debug)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Create a new identity client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Validate a session token for a user.
    ///
    /// The response must report success and carry at least one login
    /// session. The session whose token matches the presented one wins;
    /// otherwise the first session is used.
    pub async fn validate_session(&self, user_id: i64, token: &str) -> Result<SessionContext> {
        let response = self
            .http
            .post(format!("{}/v1/sessions/validate", self.base_url))
            .json(&ValidateRequest { user_id, token })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: ValidateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("identity payload: {}", e)))?;

        if payload.status != "success" {
            return Err(GatewayError::Auth(format!(
                "identity API rejected session: {}",
                payload.status
            )));
        }

        let session = payload
            .sessions
            .iter()
            .find(|s| s.token == token)
            .or_else(|| payload.sessions.first())
            .ok_or_else(|| GatewayError::Auth("identity API returned no sessions".to_string()))?;

        Ok(SessionContext {
            user_id: session.user_id,
            location_id: session.location_id,
            company_code: session.company_code.clone(),
        })
    }
}
