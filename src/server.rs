//! HTTP surface of the exporter: the metrics endpoint, a health probe,
//! and a small landing page.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::{Json, Router, routing::get};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

use crate::client::{HttpConfig, OverseerrClient};
use crate::collector::{AggregateOptions, Scraper, OPENMETRICS_CONTENT_TYPE};
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<Scraper>,
    pub telemetry_path: String,
}

pub async fn run(address: Option<SocketAddr>, config_path: Option<PathBuf>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;

    let api_key = config.overseerr.api_key.as_deref().unwrap_or_default();
    let client = OverseerrClient::new(
        &config.overseerr.address,
        api_key,
        &config.overseerr.locale,
        HttpConfig {
            connect_timeout: Duration::from_secs(config.client.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.client.request_timeout_secs),
            ..HttpConfig::default()
        },
    )
    .map_err(|e| format!("Failed to build Overseerr client: {e}"))?;

    let scraper = Scraper::new(
        Arc::new(client),
        AggregateOptions {
            genres: config.scrape.genres,
            companies: config.scrape.companies,
        },
    );
    let state = AppState {
        scraper: Arc::new(scraper),
        telemetry_path: config.server.telemetry_path.clone(),
    };

    let app = router(state);

    let bind_addr = address.unwrap_or(config.server.bind_addr);
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, path = %config.server.telemetry_path, "Overseerr exporter listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the router. Split out from [`run`] so tests can drive it with
/// `tower::ServiceExt::oneshot`.
pub fn router(state: AppState) -> Router {
    let telemetry_path = state.telemetry_path.clone();
    Router::new()
        .route("/", get(landing))
        .route("/health", get(health))
        .route(&telemetry_path, get(metrics))
        .with_state(state)
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.scraper.scrape().await;
    ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<html>
<head><title>Overseerr Exporter</title></head>
<body>
<h1>Overseerr Exporter</h1>
<p><a href="{}">Metrics</a></p>
</body>
</html>"#,
        state.telemetry_path
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
