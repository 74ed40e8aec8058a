//! Request correlation
//!
//! Every request gets a correlation id, either the caller-supplied
//! `x-correlation-id` header or a fresh UUID v4. The id is stored in the
//! request extensions, echoed as a response header, and merged into every
//! JSON body as `cid`.

use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Header carrying the correlation id in both directions
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Per-request trace identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Inherit the inbound correlation id or generate one
pub fn begin(headers: &HeaderMap) -> CorrelationId {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(CorrelationId::from)
        .unwrap_or_else(CorrelationId::generate)
}

/// Build a JSON response carrying the correlation id
///
/// Object bodies get a `cid` field; any other body is wrapped as
/// `{"data": body, "cid": ...}`.
pub fn respond<T: Serialize>(cid: &CorrelationId, status: StatusCode, body: T) -> Response {
    let mut value = match serde_json::to_value(body) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to serialize response body: {}", e);
            let fallback = json!({
                "success": false,
                "message": "Internal server error",
                "cid": cid.as_str(),
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)).into_response();
        }
    };

    if let Value::Object(map) = &mut value {
        map.insert("cid".to_string(), Value::String(cid.0.clone()));
    } else {
        value = json!({ "data": value, "cid": cid.as_str() });
    }

    (status, Json(value)).into_response()
}

/// Middleware assigning the correlation id
pub async fn correlation_middleware(mut req: Request, next: Next) -> Response {
    let cid = begin(req.headers());
    req.extensions_mut().insert(cid.clone());

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(cid.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(CORRELATION_HEADER), value);
    }
    response
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cid) = parts.extensions.get::<CorrelationId>() {
            return Ok(cid.clone());
        }

        // Routes mounted without the middleware still get a stable id.
        let cid = begin(&parts.headers);
        parts.extensions.insert(cid.clone());
        Ok(cid)
    }
}
