use thiserror::Error;

use crate::client::ClientError;

/// A page request failed. Fatal to the current scrape of that pipeline:
/// the partial request list is discarded and the pipeline's series are
/// absent this cycle. Never retried within the same scrape.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: ClientError,
    },
}

/// A per-request detail lookup failed. Swallowed by the aggregator, which
/// substitutes the sentinel label value so the request is still counted.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("detail lookup for request {request_id} failed: {source}")]
    Details {
        request_id: i64,
        #[source]
        source: ClientError,
    },
}
