//! Shared handler state

use std::sync::Arc;

use crate::admin::auth::{Authenticator, Clock, SystemClock};
use crate::common::StructuredLogger;
use crate::config::GateConfig;
use crate::crypto::HmacSigner;

/// State shared by every handler
///
/// Built once at startup from the configuration; everything inside is
/// read-only.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub authenticator: Arc<Authenticator>,
    pub signer: Arc<HmacSigner>,
    pub logger: StructuredLogger,
}

impl AppState {
    /// Create state using the wall clock
    pub fn new(config: GateConfig, logger: StructuredLogger) -> Self {
        Self::with_clock(config, logger, Arc::new(SystemClock))
    }

    /// Create state with an explicit clock
    pub fn with_clock(config: GateConfig, logger: StructuredLogger, clock: Arc<dyn Clock>) -> Self {
        let authenticator = Authenticator::new(&config, clock);
        let signer = HmacSigner::new(config.hmac_secret());

        Self {
            config: Arc::new(config),
            authenticator: Arc::new(authenticator),
            signer: Arc::new(signer),
            logger,
        }
    }
}
