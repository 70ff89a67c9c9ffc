use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub overseerr: OverseerrConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Metrics server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Path under which the metrics exposition is served
    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

/// Upstream Overseerr instance
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverseerrConfig {
    /// Base address of the Overseerr instance, e.g. `http://overseerr:5055`
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// API key (loaded from the environment, never from the config file)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for OverseerrConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            locale: default_locale(),
            api_key: None,
        }
    }
}

/// Which enrichment dimensions to collect on each scrape. Detail lookups
/// are the expensive part of a scrape, so both can be switched off.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_true")]
    pub genres: bool,
    #[serde(default = "default_true")]
    pub companies: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            genres: true,
            companies: true,
        }
    }
}

/// Upstream HTTP client timeouts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:9850".parse().expect("static address parses")
}

fn default_telemetry_path() -> String {
    "/metrics".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
[overseerr]
address = "http://overseerr:5055"
"#,
        )
        .unwrap();

        assert_eq!(config.overseerr.address, "http://overseerr:5055");
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:9850");
        assert!(config.scrape.genres);
        // Credentials never come from TOML.
        assert!(config.overseerr.api_key.is_none());
    }
}
