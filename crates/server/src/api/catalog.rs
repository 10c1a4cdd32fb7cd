//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use marquee_core::{CatalogFilters, MovieRecord, StoreStats, SyncOutcome};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Filter toggles; omitted parameters fall back to the default selection
/// (popular and top-rated on, favorites off).
#[derive(Debug, Deserialize)]
pub struct CatalogQueryParams {
    #[serde(default)]
    pub favorites: Option<bool>,
    #[serde(default)]
    pub popular: Option<bool>,
    #[serde(default)]
    pub toprated: Option<bool>,
}

impl CatalogQueryParams {
    fn into_filters(self) -> CatalogFilters {
        let defaults = CatalogFilters::default();
        CatalogFilters {
            favorites: self.favorites.unwrap_or(defaults.favorites),
            popular: self.popular.unwrap_or(defaults.popular),
            toprated: self.toprated.unwrap_or(defaults.toprated),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub movies: Vec<MovieRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub fetched: bool,
    pub upserted: usize,
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        Self {
            fetched: outcome.fetched,
            upserted: outcome.upserted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/catalog
///
/// List cached movies matching the filter selection. An empty store triggers
/// a one-time catalog sync first; a failed sync is logged and the request is
/// served from whatever the store holds.
pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<Json<CatalogListResponse>, impl IntoResponse> {
    if let Err(e) = state.engine().ensure_catalog().await {
        warn!("Catalog sync on read failed, serving cached state: {}", e);
    }

    match state.view().movies(&params.into_filters()) {
        Ok(movies) => {
            let total = movies.len();
            Ok(Json(CatalogListResponse { movies, total }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// POST /api/v1/catalog/sync
///
/// Populate the catalog if the store is empty.
pub async fn sync_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncResponse>, impl IntoResponse> {
    match state.engine().ensure_catalog().await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// POST /api/v1/catalog/refresh
///
/// Refetch the catalog unconditionally. Favorites survive the refresh.
pub async fn refresh_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncResponse>, impl IntoResponse> {
    match state.engine().refresh_catalog().await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/catalog/stats
///
/// Get store statistics.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoreStats>, impl IntoResponse> {
    match state.view().stats() {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
