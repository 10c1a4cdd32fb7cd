//! Catalog view - the read path over the store.
//!
//! The view never touches the network and never writes. It serves filtered
//! catalog reads and hands out change subscriptions, so a consumer can
//! re-query after the sync engine publishes a change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::events::{ChangeNotifier, StoreChange};
use crate::store::{
    CatalogFilters, MovieRecord, MovieStore, ReviewRecord, StoreError, StoreStats, VideoRecord,
};

/// Read-only access to the cached catalog.
#[derive(Clone)]
pub struct CatalogView {
    store: Arc<dyn MovieStore>,
    notifier: ChangeNotifier,
}

impl CatalogView {
    pub fn new(store: Arc<dyn MovieStore>, notifier: ChangeNotifier) -> Self {
        Self { store, notifier }
    }

    /// Movies matching any enabled filter flag, ordered by id.
    pub fn movies(&self, filters: &CatalogFilters) -> Result<Vec<MovieRecord>, StoreError> {
        self.store.query_movies(filters)
    }

    /// A single movie by id.
    pub fn movie(&self, id: i64) -> Result<MovieRecord, StoreError> {
        self.store.get_movie(id)
    }

    /// All favorite movies.
    pub fn favorites(&self) -> Result<Vec<MovieRecord>, StoreError> {
        self.store.query_movies(&CatalogFilters {
            favorites: true,
            popular: false,
            toprated: false,
        })
    }

    /// Cached trailer videos for a movie.
    pub fn trailers(&self, movie_id: i64) -> Result<Vec<VideoRecord>, StoreError> {
        self.store.get_trailer_videos(movie_id)
    }

    /// Cached reviews for a movie.
    pub fn reviews(&self, movie_id: i64) -> Result<Vec<ReviewRecord>, StoreError> {
        self.store.get_reviews(movie_id)
    }

    /// Store statistics.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        self.store.stats()
    }

    /// Subscribe to store changes. Delivery is last-value-wins.
    pub fn subscribe(&self) -> watch::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}
