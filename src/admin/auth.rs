//! Admin session authentication
//!
//! `Authenticator` exchanges the admin password for a signed session token and
//! verifies tokens on later requests. It holds no per-session state: every
//! verification is recomputed from the token and the configured secret.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use thiserror::Error;

use crate::admin::error::{AdminError, ApiError};
use crate::admin::session::extract_session_token;
use crate::admin::state::AppState;
use crate::admin::token::{self, SessionClaims, TokenError};
use crate::common::CorrelationId;
use crate::config::GateConfig;
use crate::crypto::verify_password;

/// Source of the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Login failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential, or an empty one, was supplied
    #[error("password is required")]
    MissingCredential,

    /// A required secret is absent or unusable; names the setting
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The credential does not match
    #[error("invalid credential")]
    InvalidCredential,

    /// The token could not be produced
    #[error("failed to issue session token")]
    Issue,
}

/// A freshly issued session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

impl IssuedSession {
    /// Cookie lifetime matching the token's validity window
    pub fn max_age_secs(&self) -> i64 {
        self.claims.expires_at - self.claims.issued_at
    }
}

/// Why a token was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoToken,
    /// Malformed, tampered or expired; clients cannot tell these apart
    InvalidToken(TokenError),
    InvalidRole,
    NotConfigured,
}

impl RejectReason {
    /// Message safe to return to clients
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoToken => "No token",
            Self::InvalidToken(_) => "Invalid token",
            Self::InvalidRole => "Invalid role",
            Self::NotConfigured => "Authentication unavailable",
        }
    }

    /// Internal detail for server-side logs
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidToken(e) => e.to_string(),
            Self::NotConfigured => "session_secret is not configured".to_string(),
            other => other.message().to_string(),
        }
    }
}

/// Result of verifying a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Authenticated(SessionClaims),
    Rejected(RejectReason),
}

impl VerifyOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Claims of the verified session, placed in the request extensions by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession(pub SessionClaims);

/// Password-to-token exchange and token verification
pub struct Authenticator {
    password_hash: Option<SecretString>,
    session_secret: Option<SecretString>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("password_hash", &self.password_hash.is_some())
            .field("session_secret", &self.session_secret.is_some())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator from the configured secrets
    pub fn new(config: &GateConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            password_hash: config.admin_password_hash(),
            session_secret: config.session_secret(),
            ttl: config.session_ttl(),
            clock,
        }
    }

    /// Verify the admin credential and issue a session token
    ///
    /// Runs a full Argon2 verification; call it from a blocking context.
    pub fn login(&self, credential: &str) -> Result<IssuedSession, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let hash = self
            .password_hash
            .as_ref()
            .ok_or(AuthError::NotConfigured("admin_password_hash"))?;
        let secret = self
            .session_secret
            .as_ref()
            .ok_or(AuthError::NotConfigured("session_secret"))?;

        let matches = verify_password(credential, hash.expose_secret())
            .map_err(|_| AuthError::NotConfigured("admin_password_hash"))?;
        if !matches {
            return Err(AuthError::InvalidCredential);
        }

        let claims = SessionClaims::admin(self.clock.now(), self.ttl);
        let token = token::encode(&claims, secret.expose_secret().as_bytes()).map_err(|e| match e {
            TokenError::MissingSecret => AuthError::NotConfigured("session_secret"),
            _ => AuthError::Issue,
        })?;

        Ok(IssuedSession { token, claims })
    }

    /// Verify a session token; never fails, only rejects
    pub fn verify(&self, token: Option<&str>) -> VerifyOutcome {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return VerifyOutcome::Rejected(RejectReason::NoToken);
        };

        let Some(secret) = self.session_secret.as_ref() else {
            return VerifyOutcome::Rejected(RejectReason::NotConfigured);
        };

        match token::decode(token, secret.expose_secret().as_bytes(), self.clock.now()) {
            Ok(claims) if claims.is_admin() => VerifyOutcome::Authenticated(claims),
            Ok(_) => VerifyOutcome::Rejected(RejectReason::InvalidRole),
            Err(TokenError::MissingSecret) => VerifyOutcome::Rejected(RejectReason::NotConfigured),
            Err(e) => VerifyOutcome::Rejected(RejectReason::InvalidToken(e)),
        }
    }
}

/// Gate for admin routes
///
/// Runs the inner handler only for a valid admin session and answers 401
/// itself otherwise. A missing session secret is reported as a configuration
/// error rather than an authentication failure.
pub async fn require_admin(
    State(state): State<AppState>,
    cid: CorrelationId,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(req.headers());

    match state.authenticator.verify(token.as_deref()) {
        VerifyOutcome::Authenticated(claims) => {
            req.extensions_mut().insert(AdminSession(claims));
            Ok(next.run(req).await)
        }
        VerifyOutcome::Rejected(reason) => {
            let context = json!({
                "cid": cid,
                "path": req.uri().path(),
                "reason": reason.message(),
                "detail": reason.detail(),
            });

            let error = if reason == RejectReason::NotConfigured {
                state.logger.error("admin gate unavailable", context);
                AdminError::Configuration("session_secret")
            } else {
                state.logger.warn("admin gate rejected request", context);
                AdminError::Unauthorized
            };
            Err(error.with_cid(&cid))
        }
    }
}
