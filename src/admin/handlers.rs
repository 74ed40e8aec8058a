//! Admin API Request Handlers
//!
//! This module implements the HTTP request handlers: login, verify, logout,
//! session introspection, signed inbound callbacks and the health check.
//! Every JSON body goes out through [`respond`] so it carries the request's
//! correlation id.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, State},
    http::{header, HeaderMap, StatusCode},
    response::{Json, Response},
};
use chrono::Utc;
use serde_json::json;

use crate::admin::auth::{AdminSession, AuthError, RejectReason, VerifyOutcome};
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::session::{clear_session_cookie, extract_session_token, session_cookie};
use crate::admin::state::AppState;
use crate::admin::types::*;
use crate::common::{redact_opt, respond, run_guarded, CorrelationId, Guarded};
use crate::crypto::SIGNATURE_HEADER;

/// Integration namespace for inbound callbacks
const CRM: &str = "crm";

/// Health check endpoint (no auth required)
pub async fn health_check(cid: CorrelationId) -> Response {
    let body = HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    };
    respond(&cid, StatusCode::OK, body)
}

/// Exchange the admin password for a session cookie
pub async fn login(
    State(state): State<AppState>,
    cid: CorrelationId,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AdminResult<Response> {
    let Json(request) = payload.map_err(|e| {
        state.logger.warn(
            "admin login rejected",
            json!({ "cid": cid, "reason": "malformed body", "status": e.status().as_u16() }),
        );
        AdminError::validation("password", "Request body must be JSON with a password field").with_cid(&cid)
    })?;

    let Some(password) = request.password.filter(|p| !p.is_empty()) else {
        state.logger.warn(
            "admin login rejected",
            json!({ "cid": cid, "reason": "missing password" }),
        );
        return Err(AdminError::validation("password", "password is required").with_cid(&cid));
    };

    // Argon2 is deliberately slow; keep it off the async workers.
    let authenticator = Arc::clone(&state.authenticator);
    let outcome = tokio::task::spawn_blocking(move || authenticator.login(&password))
        .await
        .map_err(|e| {
            state.logger.error("admin login failed", json!({ "cid": cid, "error": e.to_string() }));
            AdminError::Internal(e.to_string()).with_cid(&cid)
        })?;

    let session = match outcome {
        Ok(session) => session,
        Err(AuthError::NotConfigured(setting)) => {
            state.logger.error(
                "admin login unavailable",
                json!({ "cid": cid, "missing": setting }),
            );
            return Err(AdminError::Configuration(setting).with_cid(&cid));
        }
        Err(e) => {
            state.logger.warn(
                "admin login rejected",
                json!({ "cid": cid, "reason": e.to_string() }),
            );
            return Err(AdminError::from(e).with_cid(&cid));
        }
    };

    let cookie = session_cookie(&session.token, session.max_age_secs(), state.config.cookie_secure())
        .map_err(|e| AdminError::Internal(e.to_string()).with_cid(&cid))?;

    state.logger.info(
        "admin login succeeded",
        json!({ "cid": cid, "expiresAt": session.claims.expires_at }),
    );

    let mut response = respond(&cid, StatusCode::OK, SuccessResponse::ok());
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Report whether the request carries a valid admin session
///
/// Always answers 200; the outcome is in the body.
pub async fn verify(State(state): State<AppState>, cid: CorrelationId, headers: HeaderMap) -> Response {
    let token = extract_session_token(&headers);

    let body = match state.authenticator.verify(token.as_deref()) {
        VerifyOutcome::Authenticated(claims) => VerifyResponse {
            is_authenticated: true,
            user: Some(SessionUser { role: claims.role }),
            message: None,
        },
        VerifyOutcome::Rejected(reason) => {
            if reason == RejectReason::NotConfigured {
                state.logger.error("session verification unavailable", json!({ "cid": cid }));
            } else if reason != RejectReason::NoToken {
                state.logger.warn(
                    "session verification failed",
                    json!({ "cid": cid, "detail": reason.detail() }),
                );
            }

            VerifyResponse {
                is_authenticated: false,
                user: None,
                message: Some(reason.message().to_string()),
            }
        }
    };

    respond(&cid, StatusCode::OK, body)
}

/// Expire the session cookie
pub async fn logout(State(state): State<AppState>, cid: CorrelationId) -> AdminResult<Response> {
    let cookie = clear_session_cookie(state.config.cookie_secure())
        .map_err(|e| AdminError::Internal(e.to_string()).with_cid(&cid))?;

    state.logger.info("admin logout", json!({ "cid": cid }));

    let mut response = respond(&cid, StatusCode::OK, SuccessResponse::ok());
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Details of the current admin session (behind the gate)
pub async fn session_info(cid: CorrelationId, Extension(AdminSession(claims)): Extension<AdminSession>) -> Response {
    let body = SessionResponse {
        issued_at: claims.issued_at_time(),
        expires_at: claims.expires_at_time(),
        role: claims.role,
    };
    respond(&cid, StatusCode::OK, body)
}

/// Signed callback from an external system
///
/// The raw body must be signed with the shared HMAC secret in the
/// `x-signature` header. Contact fields are redacted before they are logged.
pub async fn inbound_hook(
    State(state): State<AppState>,
    cid: CorrelationId,
    headers: HeaderMap,
    body: Bytes,
) -> AdminResult<Response> {
    let crm = state.logger.integration(CRM);

    if !state.signer.is_configured() {
        crm.error("callback signing secret missing", json!({ "cid": cid }));
        return Err(AdminError::Configuration("hmac_secret").with_cid(&cid));
    }

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let verified = match signature {
        Some(signature) => state
            .signer
            .verify(&body, signature)
            .map_err(|e| AdminError::from(e).with_cid(&cid))?,
        None => false,
    };

    if !verified {
        let reason = match signature {
            Some(_) => "signature mismatch",
            None => "missing signature",
        };
        crm.warn("callback rejected", json!({ "cid": cid, "reason": reason }));
        return Err(AdminError::InvalidSignature.with_cid(&cid));
    }

    crm.start("callback received", json!({ "cid": cid, "bytes": body.len() }));

    let outcome = run_guarded(&state.logger, &cid, "hooks.inbound", async {
        // Category and position only: serde messages can quote input values.
        serde_json::from_slice::<InboundEvent>(&body).map_err(|e| {
            format!("invalid payload ({:?} at line {} column {})", e.classify(), e.line(), e.column())
        })
    })
    .await;

    match outcome {
        Guarded::Completed(event) => {
            crm.success(
                "callback accepted",
                json!({
                    "cid": cid,
                    "event": event.event,
                    "email": redact_opt(event.email.as_deref()),
                    "phone": redact_opt(event.phone.as_deref()),
                }),
            );
            Ok(respond(&cid, StatusCode::OK, HookAck { accepted: true, message: None }))
        }
        Guarded::Failed => Ok(respond(
            &cid,
            StatusCode::UNPROCESSABLE_ENTITY,
            HookAck {
                accepted: false,
                message: Some("Unprocessable payload".to_string()),
            },
        )),
    }
}
