//! Wire types for the Overseerr v1 REST API.
//!
//! Status values arrive as numeric codes. They are classified into typed
//! enums through `from_code`/`from_name`, which return `None` for values
//! outside the known sets — callers treat those requests as excluded
//! rather than as errors.

use serde::Deserialize;

/// Pagination envelope returned by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub page_info: PageInfo,
    pub results: Vec<T>,
}

/// Drives pagination termination only; never retained across pages.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub page: u32,
    pub pages: u32,
}

/// A media request as returned by `GET /api/v1/request`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaRequest {
    pub id: i64,
    pub status: i32,
    #[serde(default, rename = "is4k")]
    pub is_4k: bool,
    #[serde(default)]
    pub media: Option<MediaInfo>,
}

/// The media sub-record embedded in a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub media_type: String,
    pub status: i32,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
}

/// An Overseerr user, as returned by `GET /api/v1/user`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub request_count: i64,
}

/// Approval status of a request (codes 1 through 4 on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
    Available,
}

impl RequestStatus {
    /// Classify a wire status code. Unknown codes yield `None` and the
    /// request is excluded from every status bucket.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Pending),
            2 => Some(Self::Approved),
            3 => Some(Self::Declined),
            4 => Some(Self::Available),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Available => "available",
        }
    }
}

/// Fulfillment state of the underlying media item (codes 1 through 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaStatus {
    Unknown,
    Pending,
    Processing,
    PartiallyAvailable,
    Available,
}

impl MediaStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Unknown),
            2 => Some(Self::Pending),
            3 => Some(Self::Processing),
            4 => Some(Self::PartiallyAvailable),
            5 => Some(Self::Available),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::PartiallyAvailable => "partially_available",
            Self::Available => "available",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

/// Filter applied to the request listing. Only `All` is used by the
/// exporter, but the contract mirrors the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFilter {
    All,
    Pending,
    Approved,
    Available,
}

impl RequestFilter {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Available => "available",
        }
    }
}

/// Sort order for the request listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSort {
    Added,
    Modified,
}

impl RequestSort {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
        }
    }
}

/// Normalized detail record for a movie or TV show: genre names plus
/// production-company or network names, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    pub genres: Vec<String>,
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}

/// Response of `GET /api/v1/movie/{tmdb_id}`, reduced to the fields the
/// exporter labels on.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(default)]
    pub genres: Vec<NamedEntity>,
    #[serde(default)]
    pub production_companies: Vec<NamedEntity>,
}

/// Response of `GET /api/v1/tv/{tmdb_id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvDetails {
    #[serde(default)]
    pub genres: Vec<NamedEntity>,
    #[serde(default)]
    pub networks: Vec<NamedEntity>,
}

fn names(entities: Vec<NamedEntity>) -> Vec<String> {
    entities.into_iter().map(|e| e.name).collect()
}

impl From<MovieDetails> for Details {
    fn from(details: MovieDetails) -> Self {
        Self {
            genres: names(details.genres),
            companies: names(details.production_companies),
        }
    }
}

impl From<TvDetails> for Details {
    fn from(details: TvDetails) -> Self {
        Self {
            genres: names(details.genres),
            companies: names(details.networks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_page_deserializes() {
        let json = r#"{
            "pageInfo": { "pages": 3, "pageSize": 50, "results": 120, "page": 1 },
            "results": [
                {
                    "id": 7,
                    "status": 2,
                    "is4k": true,
                    "media": { "mediaType": "movie", "status": 5, "tmdbId": 550 }
                },
                { "id": 8, "status": 1 }
            ]
        }"#;

        let page: Paged<MediaRequest> = serde_json::from_str(json).unwrap();
        assert_eq!(page.page_info.pages, 3);
        assert_eq!(page.results.len(), 2);

        let first = &page.results[0];
        assert!(first.is_4k);
        let media = first.media.as_ref().unwrap();
        assert_eq!(media.media_type, "movie");
        assert_eq!(media.tmdb_id, Some(550));

        // Missing media and is4k fall back to defaults.
        let second = &page.results[1];
        assert!(!second.is_4k);
        assert!(second.media.is_none());
    }

    #[test]
    fn movie_details_normalize() {
        let json = r#"{
            "genres": [{ "id": 18, "name": "Drama" }],
            "productionCompanies": [{ "id": 1, "name": "A24" }]
        }"#;
        let details: Details = serde_json::from_str::<MovieDetails>(json).unwrap().into();
        assert_eq!(details.genres, vec!["Drama"]);
        assert_eq!(details.companies, vec!["A24"]);
    }

    #[test]
    fn tv_details_use_networks_as_companies() {
        let json = r#"{
            "genres": [{ "id": 35, "name": "Comedy" }],
            "networks": [{ "id": 2, "name": "HBO" }]
        }"#;
        let details: Details = serde_json::from_str::<TvDetails>(json).unwrap().into();
        assert_eq!(details.companies, vec!["HBO"]);
    }

    #[test]
    fn status_codes_classify() {
        assert_eq!(RequestStatus::from_code(2), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::from_code(4), Some(RequestStatus::Available));
        assert_eq!(RequestStatus::from_code(0), None);
        assert_eq!(RequestStatus::from_code(9), None);

        assert_eq!(
            MediaStatus::from_code(4),
            Some(MediaStatus::PartiallyAvailable)
        );
        assert_eq!(MediaStatus::from_code(6), None);

        assert_eq!(MediaType::from_name("tv"), Some(MediaType::Tv));
        assert_eq!(MediaType::from_name("music"), None);
    }
}
