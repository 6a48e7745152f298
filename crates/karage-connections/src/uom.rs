// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Unit-of-measure sync provider client.
//!
//! The only provider requiring token-based auth: a client-credentials
//! exchange yields a bearer token cached in an injected [`TokenCache`].
//! On a 401 the cached token is invalidated and the call retried once with
//! a fresh token; this is the one sanctioned retry in the backend.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, upstream_error};
use crate::provider::ExternalRegistrar;
use crate::token_cache::TokenCache;

/// Catalog entity kinds the provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// Unit of measure.
    Unit,
    /// Supplier.
    Supplier,
    /// Product category.
    Category,
    /// Product.
    Product,
}

impl CatalogKind {
    /// Provider path segment for this kind.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Unit => "units",
            Self::Supplier => "suppliers",
            Self::Category => "categories",
            Self::Product => "products",
        }
    }

    /// Parse a local item kind column value.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "unit" => Some(Self::Unit),
            "supplier" => Some(Self::Supplier),
            "category" => Some(Self::Category),
            "product" => Some(Self::Product),
            _ => None,
        }
    }
}

/// Catalog entity sent to the provider.
#[derive(Debug, Clone)]
pub struct CatalogEntity {
    /// Which provider collection the entity belongs to.
    pub kind: CatalogKind,
    /// Local item ID, forwarded as the provider reference.
    pub reference: i64,
    /// Entity display name.
    pub name: String,
    /// Provider-specific attributes carried as-is.
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    reference: i64,
    name: &'a str,
    attributes: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
    external_id: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the unit-of-measure sync provider.
#[derive(Debug)]
pub struct UomClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    tokens: TokenCache,
}

impl UomClient {
    /// Create a new client with an injected token cache.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tokens: TokenCache,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tokens,
        }
    }

    /// Exchange client credentials for a bearer token.
    async fn fetch_token(&self) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.client_id,
                client_secret: &self.client_secret,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(GatewayError::Auth(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("token payload: {}", e)))?;

        Ok(payload.access_token)
    }

    async fn post_sync(&self, entity: &CatalogEntity, token: &str) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(format!(
                "{}/{}/sync",
                self.base_url,
                entity.kind.path()
            ))
            .bearer_auth(token)
            .json(&SyncRequest {
                reference: entity.reference,
                name: &entity.name,
                attributes: &entity.payload,
            })
            .send()
            .await?;

        Ok(response)
    }

    async fn parse_sync(&self, response: reqwest::Response) -> Result<String> {
        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let payload: SyncResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("sync payload: {}", e)))?;

        Ok(payload.external_id)
    }

    /// Sync one catalog entity and return the provider's ID for it.
    ///
    /// A 401 means the cached token was revoked before its window ended:
    /// the cache is invalidated and the call retried once with a fresh
    /// token.
    pub async fn sync_entity(&self, entity: &CatalogEntity) -> Result<String> {
        let token = self.tokens.get_or_refresh(|| self.fetch_token()).await?;
        let response = self.post_sync(entity, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                kind = ?entity.kind,
                reference = entity.reference,
                "Cached token rejected, refreshing and retrying once"
            );
            self.tokens.invalidate().await;
            let token = self.tokens.get_or_refresh(|| self.fetch_token()).await?;
            let response = self.post_sync(entity, &token).await?;
            return self.parse_sync(response).await;
        }

        self.parse_sync(response).await
    }
}

#[async_trait]
impl ExternalRegistrar<CatalogEntity> for UomClient {
    async fn create_or_fetch(&self, entity: &CatalogEntity) -> Result<String> {
        self.sync_entity(entity).await
    }
}
