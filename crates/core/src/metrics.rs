//! Prometheus metrics for core components.
//!
//! Covers catalog sync outcomes, per-movie sub-resource resolution, remote
//! fetch failures and favorite toggles.

use once_cell::sync::Lazy;
use prometheus::core::Collector;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Catalog sync attempts by outcome ("fetched", "cached", "failed").
pub static CATALOG_SYNCS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_catalog_syncs_total", "Total catalog sync attempts"),
        &["outcome"],
    )
    .unwrap()
});

/// Sub-resource resolutions by outcome ("hit", "miss", "failed").
pub static SUBRESOURCE_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_subresource_resolutions_total",
            "Total per-movie sub-resource resolutions",
        ),
        &["outcome"],
    )
    .unwrap()
});

/// Remote fetch failures by call ("category", "videos", "reviews").
pub static REMOTE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_remote_failures_total",
            "Total remote fetch failures",
        ),
        &["call"],
    )
    .unwrap()
});

/// Favorite flag toggles.
pub static FAVORITE_TOGGLES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("marquee_favorite_toggles_total", "Total favorite toggles").unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(CATALOG_SYNCS.clone()),
        Box::new(SUBRESOURCE_RESOLUTIONS.clone()),
        Box::new(REMOTE_FAILURES.clone()),
        Box::new(FAVORITE_TOGGLES.clone()),
    ]
}
