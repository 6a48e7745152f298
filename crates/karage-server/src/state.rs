// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use karage_connections::TokenCache;
use karage_connections::esign::EsignClient;
use karage_connections::identity::IdentityClient;
use karage_connections::installments::InstallmentsClient;
use karage_connections::loyalty::LoyaltyClient;
use karage_connections::sms::SmsClient;
use karage_connections::uom::UomClient;
use karage_core::config::{AuthConfig, Config};
use karage_core::mapping::MappingRegistry;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// External-ID mapping registry.
    pub mappings: MappingRegistry,
    /// Upstream identity API client.
    pub identity: Arc<IdentityClient>,
    /// Loyalty card provider client.
    pub loyalty: Arc<LoyaltyClient>,
    /// Installment payment provider client.
    pub installments: Arc<InstallmentsClient>,
    /// E-signature provider client.
    pub esign: Arc<EsignClient>,
    /// SMS/OTP provider client.
    pub sms: Arc<SmsClient>,
    /// Unit-of-measure sync provider client.
    pub uom: Arc<UomClient>,
    /// Credential verification settings.
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    /// Build application state from configuration and a connected pool.
    pub fn new(config: &Config, pool: PgPool) -> Self {
        let p = &config.providers;

        Self {
            mappings: MappingRegistry::new(pool.clone()),
            identity: Arc::new(IdentityClient::new(config.auth.identity_api_url.clone())),
            loyalty: Arc::new(LoyaltyClient::new(
                p.loyalty_api_url.clone(),
                p.loyalty_api_key.clone(),
            )),
            installments: Arc::new(InstallmentsClient::new(
                p.installments_api_url.clone(),
                p.installments_user.clone(),
                p.installments_password.clone(),
            )),
            esign: Arc::new(EsignClient::new(
                p.esign_api_url.clone(),
                p.esign_token.clone(),
            )),
            sms: Arc::new(SmsClient::new(p.sms_api_url.clone(), p.sms_api_key.clone())),
            uom: Arc::new(UomClient::new(
                p.uom_api_url.clone(),
                p.uom_client_id.clone(),
                p.uom_client_secret.clone(),
                TokenCache::one_hour(),
            )),
            auth: Arc::new(config.auth.clone()),
            pool,
        }
    }
}
