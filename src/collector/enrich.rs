//! Detail enrichment: genre and company lookups for a single request.
//!
//! Enrichment is fail-soft. A failed lookup degrades to the
//! [`NOT_COLLECTED`] sentinel at the aggregation layer; the request is
//! still counted. Lookups are independent per request, so the aggregator
//! is free to run them concurrently.

use super::error::LookupError;
use crate::client::{Details, MediaRequest, MediaType, OverseerrApi};

/// Label value substituted when genre/company data was not looked up or
/// the lookup failed.
pub const NOT_COLLECTED: &str = "not_collected";

/// Fetch the detail record backing `request`. Movie requests hit the
/// movie endpoint, TV requests the TV endpoint; a request with no media
/// sub-record, no TMDB id, or an unrecognized media type yields empty
/// details without a network call.
pub async fn enrich(
    api: &dyn OverseerrApi,
    request: &MediaRequest,
) -> Result<Details, LookupError> {
    let Some(media) = request.media.as_ref() else {
        return Ok(Details::default());
    };
    let Some(tmdb_id) = media.tmdb_id else {
        return Ok(Details::default());
    };

    let lookup = match MediaType::from_name(&media.media_type) {
        Some(MediaType::Movie) => api.movie_details(tmdb_id).await,
        Some(MediaType::Tv) => api.tv_details(tmdb_id).await,
        None => return Ok(Details::default()),
    };

    lookup.map_err(|source| LookupError::Details {
        request_id: request.id,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{
        ClientError, MediaInfo, Paged, RequestFilter, RequestSort, User,
    };
    use async_trait::async_trait;

    struct DetailsOnly;

    #[async_trait]
    impl OverseerrApi for DetailsOnly {
        async fn list_requests(
            &self,
            _page: u32,
            _page_size: u32,
            _filter: RequestFilter,
            _sort: RequestSort,
        ) -> Result<Paged<MediaRequest>, ClientError> {
            unimplemented!("not exercised")
        }

        async fn movie_details(&self, _tmdb_id: i64) -> Result<Details, ClientError> {
            Ok(Details {
                genres: vec!["Drama".into()],
                companies: vec!["A24".into()],
            })
        }

        async fn tv_details(&self, _tmdb_id: i64) -> Result<Details, ClientError> {
            Err(ClientError::Status { code: 404 })
        }

        async fn list_users(
            &self,
            _page: u32,
            _page_size: u32,
        ) -> Result<Paged<User>, ClientError> {
            unimplemented!("not exercised")
        }
    }

    fn request(media: Option<MediaInfo>) -> MediaRequest {
        MediaRequest {
            id: 1,
            status: 2,
            is_4k: false,
            media,
        }
    }

    #[tokio::test]
    async fn movie_request_is_enriched() {
        let req = request(Some(MediaInfo {
            media_type: "movie".into(),
            status: 5,
            tmdb_id: Some(550),
        }));
        let details = enrich(&DetailsOnly, &req).await.unwrap();
        assert_eq!(details.genres, vec!["Drama"]);
    }

    #[tokio::test]
    async fn failed_lookup_surfaces_as_lookup_error() {
        let req = request(Some(MediaInfo {
            media_type: "tv".into(),
            status: 3,
            tmdb_id: Some(1399),
        }));
        let err = enrich(&DetailsOnly, &req).await.unwrap_err();
        assert!(matches!(err, LookupError::Details { request_id: 1, .. }));
    }

    #[tokio::test]
    async fn unknown_media_type_yields_empty_details() {
        let req = request(Some(MediaInfo {
            media_type: "music".into(),
            status: 1,
            tmdb_id: Some(42),
        }));
        assert_eq!(enrich(&DetailsOnly, &req).await.unwrap(), Details::default());
    }

    #[tokio::test]
    async fn missing_media_yields_empty_details() {
        assert_eq!(
            enrich(&DetailsOnly, &request(None)).await.unwrap(),
            Details::default()
        );
    }
}
