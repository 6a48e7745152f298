// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Credential verification.
//!
//! Four independent modes, one policy: never trust a credential without an
//! explicit positive match, and treat any parse or verification failure as
//! a rejection, never a crash.
//!
//! - **API key**: `X-API-Key` header matched exactly against an active user.
//! - **Session token**: `Authorization: Bearer` token carrying an embedded
//!   company code, confirmed against the upstream identity API.
//! - **Signed JWT**: HMAC-validated token in a query parameter, zero clock
//!   skew tolerance.
//! - **Webhook secret**: `x-event-secret` header compared byte-for-byte.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use karage_connections::GatewayError;
use karage_core::db;

use crate::error::ApiError;
use crate::state::AppState;

/// Marker preceding the company code embedded in session tokens.
pub const COMPANY_CODE_MARKER: &str = "KG-";

/// Company codes are at most this many characters.
const COMPANY_CODE_MAX_LEN: usize = 8;

/// Resolved local identity derived from a validated credential.
///
/// Lives for one request; there is no session store on this side.
#[derive(Debug, Clone)]
pub struct Principal {
    /// User the credential resolved to.
    pub user_id: i64,
    /// Location the request is scoped to.
    pub location_id: i64,
    /// Company code of the user.
    pub company_code: String,
}

/// Extract the company code embedded in a session token.
///
/// The code is the first run of alphanumerics after [`COMPANY_CODE_MARKER`],
/// uppercased and bounded to [`COMPANY_CODE_MAX_LEN`] characters.
pub fn parse_company_code(token: &str) -> Option<String> {
    let start = token.find(COMPANY_CODE_MARKER)? + COMPANY_CODE_MARKER.len();
    let code: String = token[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .take(COMPANY_CODE_MAX_LEN)
        .collect();

    if code.is_empty() {
        None
    } else {
        Some(code.to_ascii_uppercase())
    }
}

/// Extract a bearer token from the Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(&v[7..])
            } else {
                None
            }
        })
}

/// Principal resolved from the `X-API-Key` header.
#[derive(Debug, Clone)]
pub struct ApiKeyPrincipal(pub Principal);

impl FromRequestParts<AppState> for ApiKeyPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = parts
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if api_key.is_empty() {
            return Err(ApiError::Unauthorized("API key required".to_string()));
        }

        let user = db::get_user_by_api_key(&state.pool, api_key)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("invalid API key".to_string()))?;

        Ok(Self(Principal {
            user_id: user.user_id,
            location_id: user.location_id,
            company_code: user.company_code,
        }))
    }
}

/// Principal resolved from a bearer session token.
///
/// The embedded company code picks the user; the upstream identity API then
/// confirms the token is a live session for that user and supplies the
/// location context.
#[derive(Debug, Clone)]
pub struct SessionPrincipal(pub Principal);

impl FromRequestParts<AppState> for SessionPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("session token required".to_string()))?;

        let company_code = parse_company_code(token)
            .ok_or_else(|| ApiError::Unauthorized("malformed session token".to_string()))?;

        let user = db::get_user_by_company_code(&state.pool, &company_code)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("unknown company code".to_string()))?;

        let session = state
            .identity
            .validate_session(user.user_id, token)
            .await
            .map_err(|e| match e {
                // A transport failure is our problem, not the caller's.
                GatewayError::Transport(inner) => ApiError::Internal(inner.to_string()),
                other => {
                    tracing::debug!(error = %other, "Session validation rejected");
                    ApiError::Unauthorized("session rejected".to_string())
                }
            })?;

        Ok(Self(Principal {
            user_id: session.user_id,
            location_id: session.location_id,
            company_code: session.company_code,
        }))
    }
}

/// Verify the shared webhook secret in the `x-event-secret` header.
pub fn verify_event_secret(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let presented = headers
        .get("x-event-secret")
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    if presented == expected.as_bytes() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid event secret".to_string()))
    }
}

// Issuer and expiry are validated by the library from the raw claims;
// only the principal ID needs to land in the struct.
#[derive(Debug, Deserialize)]
struct SignedClaims {
    pid: String,
}

/// Validate an HMAC-signed callback token and return its principal ID.
///
/// Requires the configured issuer and an unexpired lifetime with zero
/// leeway. Fails closed: every validation error is a 401.
pub fn verify_signed_token(token: &str, secret: &str, issuer: &str) -> Result<String, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);

    decode::<SignedClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims.pid)
    .map_err(|e| {
        tracing::debug!(error = %e, "Signed token rejected");
        ApiError::Unauthorized("invalid signature token".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Serialize)]
    struct TestClaims {
        pid: String,
        iss: String,
        exp: u64,
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn sign(pid: &str, iss: &str, exp: u64, secret: &str) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                pid: pid.to_string(),
                iss: iss.to_string(),
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn company_code_is_extracted_and_normalized() {
        assert_eq!(
            parse_company_code("session-KG-acme42.rest").as_deref(),
            Some("ACME42")
        );
        assert_eq!(parse_company_code("KG-x").as_deref(), Some("X"));
    }

    #[test]
    fn company_code_is_length_bounded() {
        assert_eq!(
            parse_company_code("KG-abcdefghijkl").as_deref(),
            Some("ABCDEFGH")
        );
    }

    #[test]
    fn missing_or_empty_company_code_is_rejected() {
        assert_eq!(parse_company_code("no marker here"), None);
        assert_eq!(parse_company_code("KG--rest"), None);
        assert_eq!(parse_company_code("KG-"), None);
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "bEaReR KG-ACME-tok".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), Some("KG-ACME-tok"));

        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn event_secret_must_match_exactly() {
        let mut headers = HeaderMap::new();
        assert!(verify_event_secret(&headers, "s3cret").is_err());

        headers.insert("x-event-secret", "wrong".parse().unwrap());
        assert!(verify_event_secret(&headers, "s3cret").is_err());

        headers.insert("x-event-secret", "s3cret".parse().unwrap());
        assert!(verify_event_secret(&headers, "s3cret").is_ok());
    }

    #[test]
    fn valid_signed_token_yields_principal_id() {
        let token = sign("77", "karage", now() + 60, "top-secret");
        let pid = verify_signed_token(&token, "top-secret", "karage").unwrap();
        assert_eq!(pid, "77");
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let token = sign("77", "someone-else", now() + 60, "top-secret");
        assert!(verify_signed_token(&token, "top-secret", "karage").is_err());
    }

    #[test]
    fn expired_token_is_rejected_with_zero_leeway() {
        let token = sign("77", "karage", now() - 1, "top-secret");
        assert!(verify_signed_token(&token, "top-secret", "karage").is_err());
    }

    #[test]
    fn wrong_secret_and_garbage_are_rejected() {
        let token = sign("77", "karage", now() + 60, "other-secret");
        assert!(verify_signed_token(&token, "top-secret", "karage").is_err());
        assert!(verify_signed_token("not-a-jwt", "top-secret", "karage").is_err());
    }
}
