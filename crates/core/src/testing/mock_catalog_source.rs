//! Mock remote catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::remote::{CatalogSource, Category, RemoteError};
use crate::store::{MovieRecord, ReviewRecord, VideoRecord};

/// A recorded remote fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedFetch {
    Category(Category),
    Videos(i64),
    Reviews(i64),
}

/// Mock implementation of the CatalogSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable category lists, videos and reviews
/// - Track fetches for assertions
/// - Simulate failures
#[derive(Debug)]
pub struct MockCatalogSource {
    /// Category lists by category.
    categories: Arc<RwLock<HashMap<Category, Vec<MovieRecord>>>>,
    /// Enriched videos by movie id.
    videos: Arc<RwLock<HashMap<i64, Vec<VideoRecord>>>>,
    /// Reviews by movie id.
    reviews: Arc<RwLock<HashMap<i64, Vec<ReviewRecord>>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<RemoteError>>>,
}

impl Default for MockCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogSource {
    /// Create a new empty mock catalog source.
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
            videos: Arc::new(RwLock::new(HashMap::new())),
            reviews: Arc::new(RwLock::new(HashMap::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the list returned for a category.
    pub async fn set_category(&self, category: Category, movies: Vec<MovieRecord>) {
        self.categories.write().await.insert(category, movies);
    }

    /// Set the enriched videos returned for a movie.
    pub async fn set_videos(&self, movie_id: i64, videos: Vec<VideoRecord>) {
        self.videos.write().await.insert(movie_id, videos);
    }

    /// Set the reviews returned for a movie.
    pub async fn set_reviews(&self, movie_id: i64, reviews: Vec<ReviewRecord>) {
        self.reviews.write().await.insert(movie_id, reviews);
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Clear recorded fetches.
    pub async fn clear_recorded(&self) {
        self.fetches.write().await.clear();
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: RemoteError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<RemoteError> {
        self.next_error.write().await.take()
    }

    /// Record a fetch.
    async fn record(&self, fetch: RecordedFetch) {
        self.fetches.write().await.push(fetch);
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch_category(&self, category: Category) -> Result<Vec<MovieRecord>, RemoteError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedFetch::Category(category)).await;

        Ok(self
            .categories
            .read()
            .await
            .get(&category)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, RemoteError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedFetch::Videos(movie_id)).await;

        Ok(self
            .videos
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_reviews(&self, movie_id: i64) -> Result<Vec<ReviewRecord>, RemoteError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedFetch::Reviews(movie_id)).await;

        Ok(self
            .reviews
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }
}
