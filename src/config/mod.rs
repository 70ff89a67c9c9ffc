//! Configuration for the exporter
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `OVERSEERR_EXPORTER__<section>__<key>`
//!
//! Examples:
//! - `OVERSEERR_EXPORTER__SERVER__BIND_ADDR=0.0.0.0:9850`
//! - `OVERSEERR_EXPORTER__OVERSEERR__ADDRESS=http://overseerr:5055`
//! - `OVERSEERR_EXPORTER__SCRAPE__GENRES=false`
//!
//! The API key is a credential and is only read from the environment
//! (`OVERSEERR_API_KEY`), never from the configuration file.
//!
//! By default, the configuration is loaded from
//! `config/overseerr-exporter.toml`; this can be overridden using the
//! `OVERSEERR_EXPORTER_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{ClientConfig, Config, OverseerrConfig, ScrapeConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails (missing address or API key, bad paths).
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing, and for the `--config` CLI override.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let mut config = sources::load_from_sources(path)?;
        sources::load_secrets(&mut config);
        validation::validate(&config)?;
        Ok(config)
    }
}
