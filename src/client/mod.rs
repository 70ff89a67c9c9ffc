//! Overseerr upstream client: wire models, the `OverseerrApi` trait that
//! collectors scrape through, and the reqwest-backed implementation.

mod http;
mod models;
mod traits;

pub use http::{ClientError, HttpConfig, OverseerrClient};
pub use models::{
    Details, MediaInfo, MediaRequest, MediaStatus, MediaType, MovieDetails, NamedEntity, PageInfo,
    Paged, RequestFilter, RequestSort, RequestStatus, TvDetails, User,
};
pub use traits::OverseerrApi;
