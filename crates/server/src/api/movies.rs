//! Per-movie API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use marquee_core::{MovieRecord, ReviewRecord, StoreError, SyncError, VideoRecord};

use super::catalog::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    pub movie: MovieRecord,
    pub videos: Vec<VideoRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub from_cache: bool,
}

/// GET /api/v1/movies/{id}
///
/// Get a cached movie by id.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MovieRecord>, impl IntoResponse> {
    match state.view().movie(id) {
        Ok(movie) => Ok(Json(movie)),
        Err(StoreError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Movie not found: {}", id),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// POST /api/v1/movies/{id}/favorite
///
/// Flip the favorite flag and return the updated movie.
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MovieRecord>, impl IntoResponse> {
    match state.engine().toggle_favorite(id).await {
        Ok(movie) => Ok(Json(movie)),
        Err(SyncError::Store(StoreError::NotFound(_))) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Movie not found: {}", id),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/movies/{id}/details
///
/// Get a movie with its videos and reviews, fetching them on first access.
pub async fn get_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MovieDetailsResponse>, impl IntoResponse> {
    let movie = match state.view().movie(id) {
        Ok(movie) => movie,
        Err(StoreError::NotFound(_)) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Movie not found: {}", id),
                }),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    };

    match state.engine().ensure_sub_resources(id).await {
        Ok(sub) => Ok(Json(MovieDetailsResponse {
            movie,
            videos: sub.videos,
            reviews: sub.reviews,
            from_cache: sub.from_cache,
        })),
        Err(SyncError::Remote(e)) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
