use async_trait::async_trait;

use super::http::ClientError;
use super::models::{
    Details, MediaRequest, Paged, RequestFilter, RequestSort, User,
};

/// Upstream API seam. Collectors depend on this trait rather than on the
/// concrete HTTP client so scrapes can run against in-process fakes.
#[async_trait]
pub trait OverseerrApi: Send + Sync {
    /// List one page of media requests.
    async fn list_requests(
        &self,
        page: u32,
        page_size: u32,
        filter: RequestFilter,
        sort: RequestSort,
    ) -> Result<Paged<MediaRequest>, ClientError>;

    /// Fetch genre/company details for a movie.
    async fn movie_details(&self, tmdb_id: i64) -> Result<Details, ClientError>;

    /// Fetch genre/network details for a TV show.
    async fn tv_details(&self, tmdb_id: i64) -> Result<Details, ClientError>;

    /// List one page of users.
    async fn list_users(&self, page: u32, page_size: u32) -> Result<Paged<User>, ClientError>;
}
