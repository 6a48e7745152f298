// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Injectable bearer-token cache with a fixed expiry window.
//!
//! Providers that issue short-lived bearer tokens get one [`TokenCache`]
//! instance injected at construction. The cache is not process-wide state;
//! tests and multi-tenant setups construct their own.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::Result;

/// Default token lifetime assumed when the provider does not say.
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    acquired_at: Instant,
}

/// Cache holding at most one bearer token until it expires.
///
/// The slot is guarded by an async mutex held across the refresh call, so
/// concurrent callers observing an expired token trigger exactly one fetch.
#[derive(Debug)]
pub struct TokenCache {
    ttl: Duration,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a cache with the given token lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Create a cache with the default one-hour lifetime.
    pub fn one_hour() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// Return the cached token while fresh, otherwise fetch a new one
    /// through `refresh` and store it.
    ///
    /// A failed refresh leaves the slot empty so the next caller retries.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.acquired_at.elapsed() < self.ttl {
                return Ok(cached.token.clone());
            }
        }

        *slot = None;
        let token = refresh().await?;
        *slot = Some(CachedToken {
            token: token.clone(),
            acquired_at: Instant::now(),
        });

        tracing::debug!("Refreshed cached bearer token");
        Ok(token)
    }

    /// Drop the cached token, forcing the next caller to refresh.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}
