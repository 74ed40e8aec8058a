//! HMAC-SHA256 request signing
//!
//! Signatures are lowercase hex. Verification decodes the candidate and
//! compares it in constant time; a candidate that is not valid hex simply
//! fails to verify.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature of a request body
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Signing errors
///
/// A missing secret is a configuration problem and is kept apart from a
/// signature mismatch, which is reported as `Ok(false)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// No signing secret configured
    #[error("signing secret is not configured")]
    MissingSecret,

    /// Payload could not be serialized
    #[error("failed to serialize payload: {0}")]
    Serialize(String),
}

/// Sign `body` with `secret`
pub fn sign(body: &[u8], secret: &[u8]) -> Result<String, SigningError> {
    Ok(hex::encode(mac_bytes(body, secret)?))
}

/// Check `candidate` against the signature of `body`
pub fn verify(body: &[u8], secret: &[u8], candidate: &str) -> Result<bool, SigningError> {
    let expected = mac_bytes(body, secret)?;
    let Ok(candidate) = hex::decode(candidate.trim()) else {
        return Ok(false);
    };
    Ok(constant_time_eq(&expected, &candidate))
}

/// Constant-time byte comparison
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

fn mac_bytes(body: &[u8], secret: &[u8]) -> Result<Vec<u8>, SigningError> {
    if secret.is_empty() {
        return Err(SigningError::MissingSecret);
    }
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| SigningError::MissingSecret)?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// A serialized payload with its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub body: Vec<u8>,
    pub signature: String,
}

/// Signer bound to the configured shared secret
#[derive(Debug)]
pub struct HmacSigner {
    secret: Option<SecretString>,
}

impl HmacSigner {
    /// Create a signer; `None` or an empty secret leaves it unconfigured
    pub fn new(secret: Option<SecretString>) -> Self {
        let secret = secret.filter(|s| !s.expose_secret().is_empty());
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn sign(&self, body: &[u8]) -> Result<String, SigningError> {
        sign(body, self.secret()?)
    }

    pub fn verify(&self, body: &[u8], candidate: &str) -> Result<bool, SigningError> {
        verify(body, self.secret()?, candidate)
    }

    /// Header name and value to attach to an outbound request carrying `body`
    pub fn signature_header(&self, body: &[u8]) -> Result<(&'static str, String), SigningError> {
        Ok((SIGNATURE_HEADER, self.sign(body)?))
    }

    /// Serialize `payload` as JSON and sign the exact bytes sent
    pub fn sign_json<T: Serialize>(&self, payload: &T) -> Result<SignedPayload, SigningError> {
        let secret = self.secret()?;
        let body = serde_json::to_vec(payload).map_err(|e| SigningError::Serialize(e.to_string()))?;
        let signature = sign(&body, secret)?;
        Ok(SignedPayload { body, signature })
    }

    fn secret(&self) -> Result<&[u8], SigningError> {
        self.secret
            .as_ref()
            .map(|s| s.expose_secret().as_bytes())
            .ok_or(SigningError::MissingSecret)
    }
}
