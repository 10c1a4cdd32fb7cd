//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Marquee server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - Store size gauges (collected dynamically)
//! - Core metrics (catalog syncs, sub-resource resolutions, remote failures)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "marquee_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Store Metrics (collected dynamically)
// =============================================================================

/// Cached movies.
pub static STORE_MOVIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("marquee_store_movies", "Number of movies in the store").unwrap()
});

/// Cached videos.
pub static STORE_VIDEOS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("marquee_store_videos", "Number of videos in the store").unwrap()
});

/// Cached reviews.
pub static STORE_REVIEWS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("marquee_store_reviews", "Number of reviews in the store").unwrap()
});

/// Favorite movies.
pub static STORE_FAVORITES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("marquee_store_favorites", "Number of favorite movies").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Store
    registry.register(Box::new(STORE_MOVIES.clone())).unwrap();
    registry.register(Box::new(STORE_VIDEOS.clone())).unwrap();
    registry.register(Box::new(STORE_REVIEWS.clone())).unwrap();
    registry
        .register(Box::new(STORE_FAVORITES.clone()))
        .unwrap();

    // Core metrics (sync engine, remote clients)
    for metric in marquee_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the store gauges reflect current values.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(stats) = state.view().stats() {
        STORE_MOVIES.set(stats.total_movies as i64);
        STORE_VIDEOS.set(stats.total_videos as i64);
        STORE_REVIEWS.set(stats.total_reviews as i64);
        STORE_FAVORITES.set(stats.favorites as i64);
    }
}

/// Normalize a path for metric labels (replace numeric ids with a placeholder).
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        let path = "/api/v1/movies/12345";
        assert_eq!(normalize_path(path), "/api/v1/movies/{id}");
    }

    #[test]
    fn test_normalize_path_numeric_middle() {
        let path = "/api/v1/movies/42/details";
        assert_eq!(normalize_path(path), "/api/v1/movies/{id}/details");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        let path = "/api/v1/health";
        assert_eq!(normalize_path(path), "/api/v1/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access metrics to ensure they're initialized
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("marquee_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_store_gauges() {
        STORE_MOVIES.set(0);
        STORE_VIDEOS.set(0);
        STORE_REVIEWS.set(0);
        STORE_FAVORITES.set(0);

        let output = encode_metrics();
        assert!(output.contains("marquee_store_movies"));
        assert!(output.contains("marquee_store_videos"));
        assert!(output.contains("marquee_store_reviews"));
        assert!(output.contains("marquee_store_favorites"));
    }
}
