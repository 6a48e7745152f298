// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the karage integration backend.

use std::net::SocketAddr;

/// Backend configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// HTTP server bind address.
    pub http_addr: SocketAddr,
    /// Credential verification settings.
    pub auth: AuthConfig,
    /// Per-provider external API settings.
    pub providers: ProviderConfig,
}

/// Credential verification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret expected in the `x-event-secret` header on webhooks.
    pub event_secret: String,
    /// HMAC secret for signed callback tokens.
    pub jwt_secret: String,
    /// Required issuer claim on signed callback tokens.
    pub jwt_issuer: String,
    /// Base URL of the upstream identity API used for session validation.
    pub identity_api_url: String,
}

/// External provider endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Loyalty card provider base URL.
    pub loyalty_api_url: String,
    /// Loyalty card provider API key.
    pub loyalty_api_key: String,
    /// Installment payment provider base URL.
    pub installments_api_url: String,
    /// Installment payment provider Basic auth username.
    pub installments_user: String,
    /// Installment payment provider Basic auth password.
    pub installments_password: String,
    /// E-signature provider base URL.
    pub esign_api_url: String,
    /// E-signature provider bearer token.
    pub esign_token: String,
    /// SMS/OTP provider base URL.
    pub sms_api_url: String,
    /// SMS/OTP provider API key.
    pub sms_api_key: String,
    /// Unit-of-measure sync provider base URL.
    pub uom_api_url: String,
    /// Unit-of-measure sync provider OAuth client ID.
    pub uom_client_id: String,
    /// Unit-of-measure sync provider OAuth client secret.
    pub uom_client_secret: String,
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name))
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every provider credential and the webhook/JWT secrets are required;
    /// a missing secret is a startup error, never a silently-open endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("KARAGE_DATABASE_URL")?;

        let port: u16 = std::env::var("KARAGE_HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let http_addr = SocketAddr::from(([0, 0, 0, 0], port));

        let auth = AuthConfig {
            event_secret: require("KARAGE_EVENT_SECRET")?,
            jwt_secret: require("KARAGE_JWT_SECRET")?,
            jwt_issuer: std::env::var("KARAGE_JWT_ISSUER")
                .unwrap_or_else(|_| "karage".to_string()),
            identity_api_url: require("KARAGE_IDENTITY_API_URL")?,
        };

        let providers = ProviderConfig {
            loyalty_api_url: require("KARAGE_LOYALTY_API_URL")?,
            loyalty_api_key: require("KARAGE_LOYALTY_API_KEY")?,
            installments_api_url: require("KARAGE_INSTALLMENTS_API_URL")?,
            installments_user: require("KARAGE_INSTALLMENTS_USER")?,
            installments_password: require("KARAGE_INSTALLMENTS_PASSWORD")?,
            esign_api_url: require("KARAGE_ESIGN_API_URL")?,
            esign_token: require("KARAGE_ESIGN_TOKEN")?,
            sms_api_url: require("KARAGE_SMS_API_URL")?,
            sms_api_key: require("KARAGE_SMS_API_KEY")?,
            uom_api_url: require("KARAGE_UOM_API_URL")?,
            uom_client_id: require("KARAGE_UOM_CLIENT_ID")?,
            uom_client_secret: require("KARAGE_UOM_CLIENT_SECRET")?,
        };

        Ok(Self {
            database_url,
            http_addr,
            auth,
            providers,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    /// The port number is invalid.
    #[error("Invalid port number")]
    InvalidPort,
}
