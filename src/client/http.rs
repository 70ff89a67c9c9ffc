//! HTTP client for the Overseerr v1 REST API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{
    Details, MediaRequest, MovieDetails, Paged, RequestFilter, RequestSort, TvDetails, User,
};
use super::traits::OverseerrApi;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {code}")]
    Status { code: u16 },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid Overseerr address: {0}")]
    InvalidAddress(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client configuration.
///
/// The upstream API has no server-side deadline, so a hung page fetch
/// would otherwise block the whole scrape; the request timeout bounds it.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("overseerr-exporter/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Client for a single Overseerr instance, authenticated with a
/// pre-configured API key passed through on every call.
pub struct OverseerrClient {
    client: reqwest::Client,
    base_url: String,
}

impl OverseerrClient {
    pub fn new(address: &str, api_key: &str, locale: &str, config: HttpConfig) -> Result<Self> {
        let url = reqwest::Url::parse(address)
            .map_err(|e| ClientError::InvalidAddress(format!("{address}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidAddress(format!(
                "{address}: unsupported scheme {}",
                url.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|e| ClientError::RequestFailed(format!("invalid API key: {e}")))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(locale)
                .map_err(|e| ClientError::RequestFailed(format!("invalid locale: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: address.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/api/v1/{path}", self.base_url);
        debug!(%url, "overseerr api call");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                code: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OverseerrApi for OverseerrClient {
    async fn list_requests(
        &self,
        page: u32,
        page_size: u32,
        filter: RequestFilter,
        sort: RequestSort,
    ) -> Result<Paged<MediaRequest>> {
        self.get_json(
            "request",
            &[
                ("take", page_size.to_string()),
                ("skip", (page * page_size).to_string()),
                ("filter", filter.as_query_value().to_string()),
                ("sort", sort.as_query_value().to_string()),
            ],
        )
        .await
    }

    async fn movie_details(&self, tmdb_id: i64) -> Result<Details> {
        let details: MovieDetails = self.get_json(&format!("movie/{tmdb_id}"), &[]).await?;
        Ok(details.into())
    }

    async fn tv_details(&self, tmdb_id: i64) -> Result<Details> {
        let details: TvDetails = self.get_json(&format!("tv/{tmdb_id}"), &[]).await?;
        Ok(details.into())
    }

    async fn list_users(&self, page: u32, page_size: u32) -> Result<Paged<User>> {
        self.get_json(
            "user",
            &[
                ("take", page_size.to_string()),
                ("skip", (page * page_size).to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("overseerr-exporter/"));
    }

    #[test]
    fn rejects_non_http_address() {
        let result = OverseerrClient::new(
            "ftp://overseerr.local",
            "key",
            "en",
            HttpConfig::default(),
        );
        assert!(matches!(result, Err(ClientError::InvalidAddress(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = OverseerrClient::new(
            "http://overseerr.local:5055/",
            "key",
            "en",
            HttpConfig::default(),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://overseerr.local:5055");
    }
}
