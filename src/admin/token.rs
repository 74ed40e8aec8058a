//! Session token codec
//!
//! A token is `<payload>.<signature>` where `payload` is the base64url (no
//! padding) JSON encoding of [`SessionClaims`] and `signature` is the hex
//! HMAC-SHA256 of the payload text under the session secret. The signature
//! is checked before the payload is decoded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::hmac;

/// The only role allowed through the admin gate
pub const ADMIN_ROLE: &str = "admin";

/// Signed session claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Role granted by the session
    pub role: String,

    /// Issue time, Unix seconds
    pub issued_at: i64,

    /// Expiry time, Unix seconds; fixed at issue
    pub expires_at: i64,
}

impl SessionClaims {
    /// Admin claims valid for `ttl` from `now`
    pub fn admin(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            role: ADMIN_ROLE.to_string(),
            issued_at: now.timestamp(),
            expires_at: (now + ttl).timestamp(),
        }
    }

    /// Expired once `now` reaches `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    pub fn issued_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.issued_at, 0)
    }

    pub fn expires_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Token encoding and verification errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("session secret is not configured")]
    MissingSecret,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to encode token claims")]
    Encoding,
}

/// Encode and sign claims
pub fn encode(claims: &SessionClaims, secret: &[u8]) -> Result<String, TokenError> {
    let json = serde_json::to_vec(claims).map_err(|_| TokenError::Encoding)?;
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = hmac::sign(payload.as_bytes(), secret).map_err(|_| TokenError::MissingSecret)?;
    Ok(format!("{}.{}", payload, signature))
}

/// Verify a token's signature and expiry and return its claims
///
/// The role claim is returned as-is; callers decide which roles they accept.
/// Only the lowercase hex signature `encode` produces is accepted.
pub fn decode(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
    let (payload, signature) = token.trim().split_once('.').ok_or(TokenError::Malformed)?;
    if payload.is_empty() || !is_lower_hex(signature) {
        return Err(TokenError::Malformed);
    }

    let valid = hmac::verify(payload.as_bytes(), secret, signature)
        .map_err(|_| TokenError::MissingSecret)?;
    if !valid {
        return Err(TokenError::BadSignature);
    }

    let json = URL_SAFE_NO_PAD.decode(payload).map_err(|_| TokenError::Malformed)?;
    let claims: SessionClaims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

fn is_lower_hex(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
