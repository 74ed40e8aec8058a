//! Configuration loading functionality
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults (serde `default`)
//! 2. JSON configuration file
//! 3. `BACKOFFICE_GATE_*` environment variables
//!
//! Command-line flags are applied afterwards by the binary through
//! [`GateConfig::with_overrides`](super::GateConfig::with_overrides).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use log::debug;

use crate::common::{GateError, Result};
use crate::config::defaults::{CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::config::GateConfig;

/// Trait for loading configuration from different sources
pub trait ConfigLoader: Sized {
    /// Load configuration from a file only
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Load configuration from the file (if any) layered under the environment
    ///
    /// An explicit `config_file` must exist. Without one, the path named by
    /// `BACKOFFICE_GATE_CONFIG_FILE` or `config.json` is used when present.
    fn load(config_file: Option<&Path>) -> Result<Self>;
}

impl ConfigLoader for GateConfig {
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(true))
            .build()
            .map_err(|e| GateError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        settings
            .try_deserialize()
            .map_err(|e| GateError::Config(format!("Failed to parse config file {}: {}", path.display(), e)))
    }

    fn load(config_file: Option<&Path>) -> Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if path.exists() {
            debug!("Loading configuration from {}", path.display());
        }

        let settings = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Json).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config = settings.try_deserialize::<GateConfig>()?;
        Ok(config)
    }
}

fn default_config_path() -> PathBuf {
    std::env::var(CONFIG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}
