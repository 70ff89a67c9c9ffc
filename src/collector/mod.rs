//! The scrape pipeline: pagination, enrichment, aggregation, emission.
//!
//! A [`Scraper`] owns no mutable state. Every scrape builds a fresh
//! registry, recomputes everything from the upstream service, and
//! encodes the result, so concurrent scrapes never share anything and
//! nothing carries over between cycles.

pub mod aggregate;
pub mod emit;
pub mod enrich;
pub mod error;
pub mod fetch;

use std::sync::Arc;
use std::time::Instant;

use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use tracing::{debug, error};

pub use aggregate::{Aggregate, AggregateOptions, GenreKey, LabelKey};
pub use enrich::NOT_COLLECTED;
pub use error::{FetchError, LookupError};

use crate::client::OverseerrApi;

/// Content type of the exposition produced by [`Scraper::scrape`].
pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Recomputes and encodes all exported metrics on each scrape pull.
pub struct Scraper {
    api: Arc<dyn OverseerrApi>,
    options: AggregateOptions,
}

impl Scraper {
    pub fn new(api: Arc<dyn OverseerrApi>, options: AggregateOptions) -> Self {
        Self { api, options }
    }

    /// Run one full scrape and return the OpenMetrics text exposition.
    ///
    /// The request pipeline and the user pipeline are independent
    /// failure domains: a fetch failure in one is logged and that
    /// pipeline's families are simply absent this cycle (a gap, never a
    /// zero), while the other still reports. Build info is always
    /// present.
    pub async fn scrape(&self) -> String {
        let start = Instant::now();
        let mut registry = Registry::with_prefix("overseerr");

        emit::register_build_info(&mut registry);

        match fetch::fetch_all_requests(self.api.as_ref()).await {
            Ok(requests) => {
                debug!(total_requests = requests.len(), "collecting request data");
                let agg = aggregate::aggregate(self.api.as_ref(), &requests, self.options).await;
                emit::register_request_metrics(&mut registry, &agg, self.options);
            }
            Err(err) => {
                error!(error = %err, "request scrape failed, omitting request series");
            }
        }

        match fetch::fetch_all_users(self.api.as_ref()).await {
            Ok(users) => {
                debug!(total_users = users.len(), "collecting user data");
                emit::register_user_metrics(&mut registry, &users);
            }
            Err(err) => {
                error!(error = %err, "user scrape failed, omitting user series");
            }
        }

        let mut body = String::new();
        if let Err(err) = encode(&mut body, &registry) {
            error!(error = %err, "failed to encode metrics");
        }

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scrape complete"
        );
        body
    }
}
