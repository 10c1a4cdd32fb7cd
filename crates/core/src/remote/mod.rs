//! Remote catalog integration for the discovery API and the video-hosting
//! thumbnail API.
//!
//! The clients here are stateless: they fetch, map remote field names onto
//! store records, and hand the results to the sync engine for persistence.

mod tmdb;
mod types;
mod youtube;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;
pub use youtube::{YoutubeClient, YoutubeConfig};

use async_trait::async_trait;
use thiserror::Error;

use crate::store::{MovieRecord, ReviewRecord, VideoRecord};

/// Errors that can occur when talking to remote APIs.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed (unreachable host, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse a response or a required field was missing.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for the remote movie catalog.
///
/// `fetch_videos` returns only Trailer-type entries that were successfully
/// enriched with a thumbnail URL; everything else is fetched and discarded.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the first result page of a category list.
    async fn fetch_category(&self, category: Category) -> Result<Vec<MovieRecord>, RemoteError>;

    /// Fetch enriched trailer videos for a movie.
    async fn fetch_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, RemoteError>;

    /// Fetch reviews for a movie.
    async fn fetch_reviews(&self, movie_id: i64) -> Result<Vec<ReviewRecord>, RemoteError>;
}

/// Trait for the secondary thumbnail lookup used to enrich trailers.
#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    /// Resolve a medium-resolution thumbnail URL for a provider key.
    async fn thumbnail_url(&self, key: &str) -> Result<String, RemoteError>;
}
