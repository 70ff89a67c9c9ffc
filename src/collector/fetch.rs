//! Scrape coordination: paginate the upstream listing endpoints until
//! exhaustion, aborting the whole fetch on any page failure so an
//! undercount never masquerades as an authoritative low value.

use std::future::Future;

use tracing::trace;

use super::error::FetchError;
use crate::client::{
    ClientError, MediaRequest, OverseerrApi, Paged, RequestFilter, RequestSort, User,
};

/// Records requested per page. A tuning constant, deliberately not
/// exposed through configuration.
pub const PAGE_SIZE: u32 = 50;

/// Fetch every page of `fetch_page`, concatenated in page order.
/// Terminates once the page index reaches the page count reported by the
/// last response; a failed page aborts with no partial results.
async fn paginate<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Paged<T>, ClientError>>,
{
    let mut all = Vec::new();
    let mut page = 0;
    loop {
        trace!(page, "fetching page");
        let batch = fetch_page(page)
            .await
            .map_err(|source| FetchError::Page { page, source })?;
        all.extend(batch.results);
        page += 1;
        if page >= batch.page_info.pages {
            break;
        }
    }
    Ok(all)
}

/// All media requests currently known to Overseerr, sorted by add-time.
pub async fn fetch_all_requests(api: &dyn OverseerrApi) -> Result<Vec<MediaRequest>, FetchError> {
    let requests = paginate(|page| {
        api.list_requests(page, PAGE_SIZE, RequestFilter::All, RequestSort::Added)
    })
    .await?;
    trace!(total_requests = requests.len(), "fetched all requests");
    Ok(requests)
}

/// All registered users.
pub async fn fetch_all_users(api: &dyn OverseerrApi) -> Result<Vec<User>, FetchError> {
    let users = paginate(|page| api.list_users(page, PAGE_SIZE)).await?;
    trace!(total_users = users.len(), "fetched all users");
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PageInfo;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn page_of(ids: &[i64], pages: u32) -> Paged<MediaRequest> {
        Paged {
            page_info: PageInfo { page: 0, pages },
            results: ids
                .iter()
                .map(|&id| MediaRequest {
                    id,
                    status: 1,
                    is_4k: false,
                    media: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn terminates_after_reported_page_count() {
        let calls = AtomicU32::new(0);
        let pages: Vec<Vec<i64>> = vec![vec![1, 2], vec![3], vec![4, 5]];

        let result = paginate(|page| {
            calls.fetch_add(1, Ordering::SeqCst);
            let batch = page_of(&pages[page as usize], 3);
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn aborts_on_failed_page_with_no_partial_results() {
        let result: Result<Vec<MediaRequest>, FetchError> = paginate(|page| async move {
            if page == 1 {
                Err(ClientError::Status { code: 500 })
            } else {
                Ok(page_of(&[1], 3))
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Page { page: 1, .. }));
    }

    #[tokio::test]
    async fn single_page_listing_fetches_once() {
        let calls = AtomicU32::new(0);
        let result = paginate(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(page_of(&[9], 1)) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn empty_listing_reports_zero_pages() {
        let result = paginate(|_| async { Ok(page_of(&[], 0)) }).await.unwrap();
        assert!(result.is_empty());
    }
}
