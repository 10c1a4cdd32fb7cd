use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{catalog, handlers, movies};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Catalog
        .route("/catalog", get(catalog::list_catalog))
        .route("/catalog/sync", post(catalog::sync_catalog))
        .route("/catalog/refresh", post(catalog::refresh_catalog))
        .route("/catalog/stats", get(catalog::get_stats))
        // Movies
        .route("/movies/{id}", get(movies::get_movie))
        .route("/movies/{id}/favorite", post(movies::toggle_favorite))
        .route("/movies/{id}/details", get(movies::get_details))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(super::middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
