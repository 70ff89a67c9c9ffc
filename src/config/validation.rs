use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("overseerr.address is required")]
    MissingAddress,

    #[error("overseerr.address '{address}' is invalid: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Overseerr API key is required (set OVERSEERR_API_KEY)")]
    MissingApiKey,

    #[error("server.telemetry_path '{path}' must start with '/' and not be the root path")]
    InvalidTelemetryPath { path: String },

    #[error("client timeout must be positive: {field} = 0")]
    InvalidTimeout { field: &'static str },
}

/// Validate the entire configuration. Runs at startup, before any scrape
/// can occur; a failure here is fatal to the process.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_overseerr(config)?;
    validate_server(config)?;
    validate_client(config)?;
    Ok(())
}

fn validate_overseerr(config: &Config) -> Result<(), ValidationError> {
    let address = &config.overseerr.address;
    if address.is_empty() {
        return Err(ValidationError::MissingAddress);
    }

    let url = reqwest::Url::parse(address).map_err(|e| ValidationError::InvalidAddress {
        address: address.clone(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::InvalidAddress {
            address: address.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    match &config.overseerr.api_key {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingApiKey),
    }
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    let path = &config.server.telemetry_path;
    if !path.starts_with('/') || path == "/" {
        return Err(ValidationError::InvalidTelemetryPath { path: path.clone() });
    }
    Ok(())
}

fn validate_client(config: &Config) -> Result<(), ValidationError> {
    if config.client.connect_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "connect_timeout_secs",
        });
    }
    if config.client.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "request_timeout_secs",
        });
    }
    Ok(())
}
