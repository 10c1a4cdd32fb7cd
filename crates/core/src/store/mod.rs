//! Movie store - the durable local cache of catalog metadata.
//!
//! The store holds three record kinds (movies, videos, reviews) and serves
//! reads without network access once populated. It is the only shared mutable
//! resource in the system; all operations are synchronous and safe under
//! concurrent invocation.

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::*;

/// Trait for movie catalog storage.
///
/// `upsert_movie` is a blind replace-by-key; callers that only intend to set
/// some flags must read-modify-write (see [`MovieRecord::union_flags`]).
/// Per-id write ordering is the sync engine's responsibility.
pub trait MovieStore: Send + Sync {
    /// Insert or replace a movie by id.
    fn upsert_movie(&self, record: &MovieRecord) -> Result<(), StoreError>;

    /// Get a movie by id.
    fn get_movie(&self, id: i64) -> Result<MovieRecord, StoreError>;

    /// Remove a movie by id.
    fn delete_movie(&self, id: i64) -> Result<(), StoreError>;

    /// All movies matching any enabled filter flag, ordered by id.
    ///
    /// A query with no enabled flags returns an empty list.
    fn query_movies(&self, filters: &CatalogFilters) -> Result<Vec<MovieRecord>, StoreError>;

    /// All movies in the store, ordered by id.
    fn all_movies(&self) -> Result<Vec<MovieRecord>, StoreError>;

    /// Whether the store holds no movies at all.
    fn is_empty(&self) -> Result<bool, StoreError>;

    /// Insert or replace a video by identity.
    fn upsert_video(&self, record: &VideoRecord) -> Result<(), StoreError>;

    /// All videos for a movie.
    fn get_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, StoreError>;

    /// Videos of type "Trailer" for a movie.
    fn get_trailer_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, StoreError>;

    /// Insert or replace a review by identity.
    fn upsert_review(&self, record: &ReviewRecord) -> Result<(), StoreError>;

    /// All reviews for a movie.
    fn get_reviews(&self, movie_id: i64) -> Result<Vec<ReviewRecord>, StoreError>;

    /// Store statistics.
    fn stats(&self) -> Result<StoreStats, StoreError>;

    /// Clear all cached data.
    fn clear(&self) -> Result<(), StoreError>;
}
