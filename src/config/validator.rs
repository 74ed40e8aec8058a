//! Configuration validator
//!
//! Hard errors stop startup. Missing secrets only warn: the endpoints that
//! need them answer with a configuration error at request time instead.

use log::warn;
use secrecy::ExposeSecret;

use crate::common::{GateError, Result};
use crate::config::defaults::MAX_SESSION_TTL_SECS;
use crate::config::GateConfig;
use crate::crypto::password::validate_hash;

/// Trait for validating configuration
pub trait ConfigValidator {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}

impl ConfigValidator for GateConfig {
    fn validate(&self) -> Result<()> {
        validate_general_settings(self)?;
        validate_secrets(self)?;
        Ok(())
    }
}

/// Validate general settings
fn validate_general_settings(config: &GateConfig) -> Result<()> {
    match config.log_level.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => {}
        level => {
            warn!(
                "log_level {:?} is not a plain level; env_logger will read it as a filter directive",
                level
            );
        }
    }

    if config.session_ttl_secs == 0 {
        return Err(GateError::Config(
            "session_ttl_secs must be greater than 0".to_string(),
        ));
    }

    if config.session_ttl_secs > MAX_SESSION_TTL_SECS {
        return Err(GateError::Config(format!(
            "session_ttl_secs must not exceed {}",
            MAX_SESSION_TTL_SECS
        )));
    }

    Ok(())
}

/// Validate secret settings
fn validate_secrets(config: &GateConfig) -> Result<()> {
    match &config.admin_password_hash {
        Some(hash) => {
            // Never echo the value itself
            validate_hash(hash.expose_secret()).map_err(|_| {
                GateError::Config("admin_password_hash is not a valid Argon2 PHC string".to_string())
            })?;
        }
        None => warn!("admin_password_hash is not configured; admin login will be unavailable"),
    }

    if config.session_secret.is_none() {
        warn!("session_secret is not configured; admin sessions cannot be issued or verified");
    }

    if config.hmac_secret.is_none() {
        warn!("hmac_secret is not configured; signed callbacks will be rejected");
    }

    Ok(())
}
