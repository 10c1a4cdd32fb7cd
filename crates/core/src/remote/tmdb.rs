//! Discovery API client (TMDB-shaped).
//!
//! Fetches category lists and per-movie sub-resources. Trailer entries are
//! enriched through a secondary [`ThumbnailSource`] lookup before they are
//! returned; everything else in a video batch is discarded by design.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Category, RemoteError, ThumbnailSource};
use crate::store::{MovieRecord, ReviewRecord, VideoRecord};

/// Discovery API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Discovery API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    thumbnails: Arc<dyn ThumbnailSource>,
}

impl TmdbClient {
    /// Create a new client with the given thumbnail backend for enrichment.
    pub fn new(
        config: TmdbConfig,
        thumbnails: Arc<dyn ThumbnailSource>,
    ) -> Result<Self, RemoteError> {
        if config.api_key.is_empty() {
            return Err(RemoteError::NotConfigured(
                "discovery API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            thumbnails,
        })
    }

    async fn get_results(&self, url: &str) -> Result<Vec<serde_json::Value>, RemoteError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(RemoteError::NotConfigured(
                "invalid discovery API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: ResultsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::ParseError(format!("missing results array: {}", e)))?;

        Ok(list.results)
    }

    /// Enrich raw video entries: keep Trailer-type entries whose thumbnail
    /// lookup succeeds, drop everything else.
    async fn enrich_trailers(&self, movie_id: i64, entries: Vec<VideoResult>) -> Vec<VideoRecord> {
        let mut enriched = Vec::new();

        for entry in entries {
            if entry.kind != "Trailer" {
                continue;
            }

            match self.thumbnails.thumbnail_url(&entry.key).await {
                Ok(image_url) => {
                    enriched.push(entry.into_record(movie_id, Some(image_url)));
                }
                Err(e) => {
                    warn!(
                        "Thumbnail lookup failed for movie {} key {}: {}",
                        movie_id, entry.key, e
                    );
                }
            }
        }

        enriched
    }
}

#[async_trait::async_trait]
impl super::CatalogSource for TmdbClient {
    async fn fetch_category(&self, category: Category) -> Result<Vec<MovieRecord>, RemoteError> {
        let url = format!("{}/discover/{}", self.base_url, category);

        debug!("Fetching category list: {}", category);

        let results = self.get_results(&url).await?;
        let movies = parse_movies(results, category);

        debug!("Category {} returned {} movies", category, movies.len());
        Ok(movies)
    }

    async fn fetch_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, RemoteError> {
        let url = format!("{}/movie/{}/videos", self.base_url, movie_id);

        debug!("Fetching videos for movie {}", movie_id);

        let results = self.get_results(&url).await?;
        let entries = parse_video_entries(results, movie_id);

        Ok(self.enrich_trailers(movie_id, entries).await)
    }

    async fn fetch_reviews(&self, movie_id: i64) -> Result<Vec<ReviewRecord>, RemoteError> {
        let url = format!("{}/movie/{}/reviews", self.base_url, movie_id);

        debug!("Fetching reviews for movie {}", movie_id);

        let results = self.get_results(&url).await?;

        Ok(parse_reviews(results, movie_id))
    }
}

// One malformed entry must not abort a batch: each element is decoded on
// its own and a failure skips only that element.

fn parse_movies(results: Vec<serde_json::Value>, category: Category) -> Vec<MovieRecord> {
    let mut movies = Vec::new();
    for value in results {
        match serde_json::from_value::<DiscoverResult>(value) {
            Ok(result) => movies.push(result.into_record(category)),
            Err(e) => warn!("Skipping malformed {} entry: {}", category, e),
        }
    }
    movies
}

fn parse_video_entries(results: Vec<serde_json::Value>, movie_id: i64) -> Vec<VideoResult> {
    let mut entries = Vec::new();
    for value in results {
        match serde_json::from_value::<VideoResult>(value) {
            Ok(result) => entries.push(result),
            Err(e) => warn!("Skipping malformed video entry for {}: {}", movie_id, e),
        }
    }
    entries
}

fn parse_reviews(results: Vec<serde_json::Value>, movie_id: i64) -> Vec<ReviewRecord> {
    let mut reviews = Vec::new();
    for value in results {
        match serde_json::from_value::<ReviewResult>(value) {
            Ok(result) => reviews.push(ReviewRecord::new(movie_id, result.author, result.content)),
            Err(e) => warn!("Skipping malformed review entry for {}: {}", movie_id, e),
        }
    }
    reviews
}

// ============================================================================
// API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DiscoverResult {
    id: i64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    popularity: Option<f64>,
    poster_path: Option<String>,
    original_language: Option<String>,
}

impl DiscoverResult {
    fn into_record(self, category: Category) -> MovieRecord {
        MovieRecord {
            id: self.id,
            // Movie lists carry `title`/`release_date`, TV-flavored entries
            // carry `name`/`first_air_date`.
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            release_date: self.release_date.or(self.first_air_date).unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0) as i64,
            vote_count: self.vote_count.unwrap_or(0),
            popularity: self.popularity.unwrap_or(0.0),
            poster_path: self.poster_path.unwrap_or_default(),
            original_language: self.original_language.unwrap_or_default(),
            favorite: false,
            popular: category == Category::Popular,
            toprated: category == Category::TopRated,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoResult {
    #[serde(default)]
    iso_639_1: String,
    #[serde(default)]
    iso_3166_1: String,
    key: String,
    #[serde(default)]
    site: String,
    #[serde(default)]
    size: u32,
    #[serde(rename = "type")]
    kind: String,
}

impl VideoResult {
    fn into_record(self, movie_id: i64, image_url: Option<String>) -> VideoRecord {
        VideoRecord {
            identity: Uuid::new_v4().to_string(),
            movie_id,
            iso_639_1: self.iso_639_1,
            iso_3166_1: self.iso_3166_1,
            key: self.key,
            site: self.site,
            size: self.size,
            kind: self.kind,
            image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewResult {
    author: String,
    content: String,
}
