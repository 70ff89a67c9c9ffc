//! The aggregation engine: one pass over the scraped request set,
//! bucketing into composite label tuples.
//!
//! There is exactly one engine, parameterized by which enrichment
//! dimensions are active. It produces both the composite per-request map
//! (primary-genre semantics: one bucket per request) and the genre
//! fan-out map (incidence semantics: one increment per genre carried by
//! the request) from a single enrichment call per request.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use tracing::debug;

use super::enrich::{enrich, NOT_COLLECTED};
use crate::client::{
    Details, MediaRequest, MediaStatus, MediaType, OverseerrApi, RequestStatus,
};

/// Upper bound on in-flight detail lookups per scrape.
pub const ENRICH_CONCURRENCY: usize = 8;

/// Which optional label dimensions to collect. Disabled dimensions skip
/// the detail lookups entirely and carry the sentinel value instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub genres: bool,
    pub companies: bool,
}

/// Composite grouping key. Two requests with identical tuples are
/// indistinguishable in the output; only the count differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelKey {
    pub media_type: MediaType,
    pub request_status: RequestStatus,
    pub media_status: MediaStatus,
    pub is_4k: bool,
    pub genre: String,
    pub company: String,
}

/// Grouping key for the genre fan-out map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenreKey {
    pub genre: String,
    pub media_type: MediaType,
}

/// Result of one aggregation pass. Owned by a single scrape; nothing
/// carries over to the next one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub requests: HashMap<LabelKey, u64>,
    pub genres: HashMap<GenreKey, u64>,
}

impl Aggregate {
    /// Total across all composite buckets.
    pub fn total(&self) -> u64 {
        self.requests.values().sum()
    }
}

struct Classified<'a> {
    request: &'a MediaRequest,
    media_type: MediaType,
    request_status: RequestStatus,
    media_status: MediaStatus,
}

/// The documented exclude-unknown filter: a request with no media
/// sub-record, or whose media type or either status code falls outside
/// the known enum sets, belongs to no bucket. Not an error.
fn classify(request: &MediaRequest) -> Option<Classified<'_>> {
    let media = request.media.as_ref()?;
    Some(Classified {
        request,
        media_type: MediaType::from_name(&media.media_type)?,
        request_status: RequestStatus::from_code(request.status)?,
        media_status: MediaStatus::from_code(media.status)?,
    })
}

fn label_or_sentinel(enabled: bool, first: Option<&String>) -> String {
    if enabled {
        first
            .cloned()
            .unwrap_or_else(|| NOT_COLLECTED.to_string())
    } else {
        NOT_COLLECTED.to_string()
    }
}

/// Bucket `requests` into label-tuple counts.
///
/// Detail lookups run with bounded concurrency, but only this task
/// mutates the maps, so counts are deterministic regardless of lookup
/// completion order.
pub async fn aggregate(
    api: &dyn OverseerrApi,
    requests: &[MediaRequest],
    options: AggregateOptions,
) -> Aggregate {
    let need_details = options.genres || options.companies;
    let mut agg = Aggregate::default();

    let mut enriched = stream::iter(requests.iter().filter_map(classify))
        .map(|entry| async move {
            let details = if need_details {
                match enrich(api, entry.request).await {
                    Ok(details) => details,
                    Err(err) => {
                        debug!(error = %err, "enrichment failed, using sentinel labels");
                        Details::default()
                    }
                }
            } else {
                Details::default()
            };
            (entry, details)
        })
        .buffer_unordered(ENRICH_CONCURRENCY)
        .boxed();

    while let Some((entry, details)) = enriched.next().await {
        let key = LabelKey {
            media_type: entry.media_type,
            request_status: entry.request_status,
            media_status: entry.media_status,
            is_4k: entry.request.is_4k,
            genre: label_or_sentinel(options.genres, details.genres.first()),
            company: label_or_sentinel(options.companies, details.companies.first()),
        };
        *agg.requests.entry(key).or_insert(0) += 1;

        if options.genres {
            for genre in &details.genres {
                *agg
                    .genres
                    .entry(GenreKey {
                        genre: genre.clone(),
                        media_type: entry.media_type,
                    })
                    .or_insert(0) += 1;
            }
        }
    }

    agg
}
