//! Configuration module
//!
//! This module handles application configuration, including loading from
//! different sources (files, environment variables, command line arguments)
//! and validating the configuration.
//!
//! Secrets are read once at startup and held as [`SecretString`]; the
//! configuration is then shared read-only behind an `Arc`.

pub mod defaults;
mod loader;
mod validator;

pub use self::loader::ConfigLoader;
pub use self::validator::ConfigValidator;
pub use defaults::{CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX};

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::GateError;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

// Case-insensitive so that `PRODUCTION` from the environment is accepted
impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Environment::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Default for Environment {
    fn default() -> Self {
        defaults::environment()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = GateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(GateError::Config(format!(
                "Invalid environment: {}. Valid values are: development, production",
                s
            ))),
        }
    }
}

/// Custom deserializer for socket addresses
fn deserialize_socket_addr<'de, D>(deserializer: D) -> std::result::Result<SocketAddr, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    SocketAddr::from_str(s.trim()).map_err(serde::de::Error::custom)
}

/// Deserialize an optional secret; empty strings count as absent
fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|s| !s.trim().is_empty())
        .map(SecretString::from))
}

/// Gate configuration
///
/// Contains every option the server needs, including the three secrets:
/// the admin credential hash, the session-signing secret and the HMAC secret
/// shared with external systems.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Listen address for the HTTP server
    #[serde(deserialize_with = "deserialize_socket_addr")]
    pub listen: SocketAddr,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Deployment environment; production marks cookies `Secure`
    pub environment: Environment,

    /// Argon2id PHC string of the admin password
    #[serde(deserialize_with = "deserialize_secret")]
    pub admin_password_hash: Option<SecretString>,

    /// Secret signing session tokens
    #[serde(deserialize_with = "deserialize_secret")]
    pub session_secret: Option<SecretString>,

    /// Secret shared with external systems for request signatures
    #[serde(deserialize_with = "deserialize_secret")]
    pub hmac_secret: Option<SecretString>,

    /// Session lifetime in seconds, measured from issuance
    pub session_ttl_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            listen: defaults::listen(),
            log_level: defaults::log_level(),
            environment: defaults::environment(),
            admin_password_hash: None,
            session_secret: None,
            hmac_secret: None,
            session_ttl_secs: defaults::session_ttl_secs(),
        }
    }
}

impl GateConfig {
    /// Whether session cookies carry the `Secure` attribute
    pub fn cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Session lifetime
    pub fn session_ttl(&self) -> chrono::Duration {
        let secs = self.session_ttl_secs.min(defaults::MAX_SESSION_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Copy of the HMAC secret for a signer
    pub fn hmac_secret(&self) -> Option<SecretString> {
        copy_secret(self.hmac_secret.as_ref())
    }

    /// Copy of the session-signing secret
    pub fn session_secret(&self) -> Option<SecretString> {
        copy_secret(self.session_secret.as_ref())
    }

    /// Copy of the admin credential hash
    pub fn admin_password_hash(&self) -> Option<SecretString> {
        copy_secret(self.admin_password_hash.as_ref())
    }

    /// Apply command-line overrides (highest priority)
    pub fn with_overrides(
        mut self,
        listen: Option<SocketAddr>,
        log_level: Option<String>,
        environment: Option<Environment>,
    ) -> Self {
        if let Some(listen) = listen {
            self.listen = listen;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        if let Some(environment) = environment {
            self.environment = environment;
        }
        self
    }
}

fn copy_secret(secret: Option<&SecretString>) -> Option<SecretString> {
    secret.map(|s| SecretString::from(s.expose_secret().to_string()))
}

/// Log the configuration without secret values
pub fn log_config(config: &GateConfig) {
    use log::info;

    if !log::log_enabled!(log::Level::Info) {
        return;
    }

    let state = |present: bool| if present { "configured" } else { "missing" };

    info!("=== Final Configuration ===");
    info!("  Listen address: {}", config.listen);
    info!("  Log level: {}", config.log_level);
    info!("  Environment: {}", config.environment);
    info!("  Session lifetime: {} seconds", config.session_ttl_secs);
    info!("  Admin password hash: {}", state(config.admin_password_hash.is_some()));
    info!("  Session secret: {}", state(config.session_secret.is_some()));
    info!("  HMAC secret: {}", state(config.hmac_secret.is_some()));
    info!("=========================");
}
