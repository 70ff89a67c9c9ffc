//! Metric emission: converts aggregate maps into `prometheus-client`
//! gauge families.
//!
//! Emission is sparse. One sample exists per occupied bucket; label
//! combinations that never occurred in the current scrape are absent,
//! never zero-filled. Label order in the exposition matches the field
//! order of the label structs below, which is the declared schema.

use std::collections::HashMap;

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

use super::aggregate::{Aggregate, AggregateOptions};
use crate::client::{MediaStatus, RequestStatus, User};

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub media_type: String,
    pub is_4k: String,
    pub request_status: String,
    pub media_status: String,
    pub genre: String,
    pub company: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusLabels {
    pub media_type: String,
    pub is_4k: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct GenreLabels {
    pub genre: String,
    pub media_type: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct UserLabels {
    pub email: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct BuildInfoLabels {
    pub version: String,
}

fn bool_label(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Always present, even when every scrape pipeline failed. Lets a
/// dashboard distinguish "exporter down" from "upstream unreachable".
pub fn register_build_info(registry: &mut Registry) {
    let build_info = Family::<BuildInfoLabels, Gauge>::default();
    build_info
        .get_or_create(&BuildInfoLabels {
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
        .set(1);
    registry.register(
        "exporter_build_info",
        "Build information of the exporter",
        build_info,
    );
}

/// Register every request-derived family from one aggregation result:
/// the composite count, the per-request-status rollups, the media-status
/// rollups, and (when genre collection is active) the genre fan-out.
pub fn register_request_metrics(
    registry: &mut Registry,
    agg: &Aggregate,
    options: AggregateOptions,
) {
    let count = Family::<RequestLabels, Gauge>::default();
    for (key, &value) in &agg.requests {
        count
            .get_or_create(&RequestLabels {
                media_type: key.media_type.as_str().to_string(),
                is_4k: bool_label(key.is_4k),
                request_status: key.request_status.as_str().to_string(),
                media_status: key.media_status.as_str().to_string(),
                genre: key.genre.clone(),
                company: key.company.clone(),
            })
            .set(value as i64);
    }
    registry.register("requests_count", "Number of requests on Overseerr", count);

    register_status_rollups(registry, agg);
    register_media_status_rollups(registry, agg);

    if options.genres {
        let genre_count = Family::<GenreLabels, Gauge>::default();
        for (key, &value) in &agg.genres {
            genre_count
                .get_or_create(&GenreLabels {
                    genre: key.genre.clone(),
                    media_type: key.media_type.as_str().to_string(),
                })
                .set(value as i64);
        }
        registry.register(
            "request_genre_count",
            "Number of requests for a given genre",
            genre_count,
        );
    }
}

fn register_status_rollups(registry: &mut Registry, agg: &Aggregate) {
    let families = [
        (
            RequestStatus::Approved,
            "request_status_approved",
            "Number of requests that are approved",
        ),
        (
            RequestStatus::Declined,
            "request_status_declined",
            "Number of requests that are declined",
        ),
        (
            RequestStatus::Pending,
            "request_status_pending",
            "Number of requests that are still pending",
        ),
        (
            RequestStatus::Available,
            "request_status_available",
            "Number of requests that are available to watch",
        ),
    ];

    for (status, name, help) in families {
        let mut totals: HashMap<StatusLabels, u64> = HashMap::new();
        for (key, &value) in &agg.requests {
            if key.request_status == status {
                *totals
                    .entry(StatusLabels {
                        media_type: key.media_type.as_str().to_string(),
                        is_4k: bool_label(key.is_4k),
                    })
                    .or_insert(0) += value;
            }
        }

        let family = Family::<StatusLabels, Gauge>::default();
        for (labels, total) in totals {
            family.get_or_create(&labels).set(total as i64);
        }
        registry.register(name, help, family);
    }
}

fn register_media_status_rollups(registry: &mut Registry, agg: &Aggregate) {
    let gauges = [
        (
            MediaStatus::Available,
            "request_media_status_available",
            "Number of requests where the media is available to watch",
        ),
        (
            MediaStatus::PartiallyAvailable,
            "request_media_status_part_available",
            "Number of requests where the media is partially available to watch",
        ),
        (
            MediaStatus::Processing,
            "request_media_status_processing",
            "Number of requests where the media is currently processing",
        ),
        (
            MediaStatus::Pending,
            "request_media_status_pending",
            "Number of requests where the media is currently pending",
        ),
        (
            MediaStatus::Unknown,
            "request_media_status_unknown",
            "Number of requests where the media status is unknown",
        ),
    ];

    for (status, name, help) in gauges {
        let total: u64 = agg
            .requests
            .iter()
            .filter(|(key, _)| key.media_status == status)
            .map(|(_, &value)| value)
            .sum();

        // Label-less rollups report an authoritative zero when the
        // pipeline succeeded but no request is in that state.
        let gauge: Gauge = Gauge::default();
        gauge.set(total as i64);
        registry.register(name, help, gauge);
    }
}

/// Per-user request counts.
pub fn register_user_metrics(registry: &mut Registry, users: &[User]) {
    let requests = Family::<UserLabels, Gauge>::default();
    for user in users {
        requests
            .get_or_create(&UserLabels {
                email: user.email.clone(),
            })
            .set(user.request_count);
    }
    registry.register("user_requests", "Number of requests made by a user", requests);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::aggregate::LabelKey;
    use crate::collector::enrich::NOT_COLLECTED;
    use crate::client::MediaType;
    use prometheus_client::encoding::text::encode;

    fn key(
        media_type: MediaType,
        request_status: RequestStatus,
        media_status: MediaStatus,
        is_4k: bool,
    ) -> LabelKey {
        LabelKey {
            media_type,
            request_status,
            media_status,
            is_4k,
            genre: NOT_COLLECTED.to_string(),
            company: NOT_COLLECTED.to_string(),
        }
    }

    fn render(agg: &Aggregate, options: AggregateOptions) -> String {
        let mut registry = Registry::with_prefix("overseerr");
        register_request_metrics(&mut registry, agg, options);
        let mut out = String::new();
        encode(&mut out, &registry).unwrap();
        out
    }

    #[test]
    fn composite_count_uses_declared_label_order() {
        let mut agg = Aggregate::default();
        agg.requests.insert(
            key(
                MediaType::Movie,
                RequestStatus::Approved,
                MediaStatus::Available,
                false,
            ),
            2,
        );

        let out = render(&agg, AggregateOptions::default());
        assert!(out.contains(
            "overseerr_requests_count{media_type=\"movie\",is_4k=\"false\",\
             request_status=\"approved\",media_status=\"available\",\
             genre=\"not_collected\",company=\"not_collected\"} 2"
        ));
    }

    #[test]
    fn status_rollups_are_sparse() {
        let mut agg = Aggregate::default();
        agg.requests.insert(
            key(
                MediaType::Movie,
                RequestStatus::Approved,
                MediaStatus::Available,
                false,
            ),
            2,
        );
        agg.requests.insert(
            key(
                MediaType::Tv,
                RequestStatus::Pending,
                MediaStatus::Processing,
                true,
            ),
            1,
        );

        let out = render(&agg, AggregateOptions::default());
        assert!(out.contains(
            "overseerr_request_status_approved{media_type=\"movie\",is_4k=\"false\"} 2"
        ));
        assert!(out.contains(
            "overseerr_request_status_pending{media_type=\"tv\",is_4k=\"true\"} 1"
        ));
        // No samples for unobserved combinations.
        assert!(!out.contains("overseerr_request_status_approved{media_type=\"tv\""));
        assert!(!out.contains("overseerr_request_status_declined{"));
    }

    #[test]
    fn status_rollup_sums_across_other_dimensions() {
        let mut agg = Aggregate::default();
        agg.requests.insert(
            key(
                MediaType::Movie,
                RequestStatus::Approved,
                MediaStatus::Available,
                false,
            ),
            2,
        );
        agg.requests.insert(
            key(
                MediaType::Movie,
                RequestStatus::Approved,
                MediaStatus::Processing,
                false,
            ),
            3,
        );

        let out = render(&agg, AggregateOptions::default());
        assert!(out.contains(
            "overseerr_request_status_approved{media_type=\"movie\",is_4k=\"false\"} 5"
        ));
    }

    #[test]
    fn media_status_rollups_report_authoritative_zeros() {
        let mut agg = Aggregate::default();
        agg.requests.insert(
            key(
                MediaType::Movie,
                RequestStatus::Approved,
                MediaStatus::PartiallyAvailable,
                false,
            ),
            4,
        );

        let out = render(&agg, AggregateOptions::default());
        assert!(out.contains("overseerr_request_media_status_part_available 4"));
        assert!(out.contains("overseerr_request_media_status_unknown 0"));
    }

    #[test]
    fn genre_fan_out_family_only_when_enabled() {
        let mut agg = Aggregate::default();
        agg.genres.insert(
            crate::collector::aggregate::GenreKey {
                genre: "Drama".to_string(),
                media_type: MediaType::Tv,
            },
            1,
        );

        let disabled = render(&agg, AggregateOptions::default());
        assert!(!disabled.contains("overseerr_request_genre_count"));

        let enabled = render(
            &agg,
            AggregateOptions {
                genres: true,
                companies: false,
            },
        );
        assert!(enabled.contains(
            "overseerr_request_genre_count{genre=\"Drama\",media_type=\"tv\"} 1"
        ));
    }

    #[test]
    fn user_requests_labelled_by_email() {
        let mut registry = Registry::with_prefix("overseerr");
        register_user_metrics(
            &mut registry,
            &[User {
                email: "ops@example.com".to_string(),
                request_count: 12,
            }],
        );
        let mut out = String::new();
        encode(&mut out, &registry).unwrap();
        assert!(out.contains("overseerr_user_requests{email=\"ops@example.com\"} 12"));
    }

    #[test]
    fn build_info_carries_crate_version() {
        let mut registry = Registry::with_prefix("overseerr");
        register_build_info(&mut registry);
        let mut out = String::new();
        encode(&mut out, &registry).unwrap();
        assert!(out.contains(&format!(
            "overseerr_exporter_build_info{{version=\"{}\"}} 1",
            env!("CARGO_PKG_VERSION")
        )));
    }
}
