//! Types for the movie store (local catalog cache).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A cached movie entry.
///
/// Keyed by the remote catalog's movie id; exactly one record exists per id.
/// The three category flags are orthogonal: a movie can be popular, top-rated
/// and favorited at the same time. Writers that only intend to set one flag
/// must read-modify-write (see [`MovieRecord::union_flags`]), the store itself
/// replaces the whole row by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Remote catalog id (never generated locally).
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Release date as reported by the remote source (e.g. "1999-03-30").
    pub release_date: String,
    /// Vote average on the remote's integer scale.
    pub vote_average: i64,
    pub vote_count: i64,
    pub popularity: f64,
    /// Poster path fragment, joined with an image base URL by consumers.
    pub poster_path: String,
    pub original_language: String,
    /// User-controlled flag, never set by remote fetches.
    pub favorite: bool,
    /// Set when the movie came from the "popular" category list.
    pub popular: bool,
    /// Set when the movie came from the "top_rated" category list.
    pub toprated: bool,
}

impl MovieRecord {
    /// Combine this record's flags with an existing record's flags (logical OR).
    ///
    /// Used by callers performing merge-on-write: a category refresh must not
    /// unset a favorite, and a popular fetch must not clear `toprated`.
    pub fn union_flags(mut self, existing: &MovieRecord) -> Self {
        self.favorite |= existing.favorite;
        self.popular |= existing.popular;
        self.toprated |= existing.toprated;
        self
    }
}

/// A video entry belonging to a movie (zero or more per movie).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Locally generated identity (uuid v4).
    pub identity: String,
    /// Owning movie id.
    pub movie_id: i64,
    /// Language code (e.g. "en").
    pub iso_639_1: String,
    /// Region code (e.g. "US").
    pub iso_3166_1: String,
    /// Opaque provider key used to build a playback URL.
    pub key: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Resolution size (e.g. 1080).
    pub size: u32,
    /// Video type as reported by the remote (e.g. "Trailer", "Clip").
    #[serde(rename = "type")]
    pub kind: String,
    /// Thumbnail URL, present only after successful enrichment.
    /// Only Trailer-type entries are ever enriched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl VideoRecord {
    pub fn is_trailer(&self) -> bool {
        self.kind == "Trailer"
    }
}

/// A review entry belonging to a movie.
///
/// The remote source provides no dedup key, so repeated fetches for the same
/// movie append duplicates; the sync engine's once-per-cold-start gate is the
/// only safeguard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Locally generated identity (uuid v4).
    pub identity: String,
    /// Owning movie id.
    pub movie_id: i64,
    pub author: String,
    pub content: String,
}

impl ReviewRecord {
    pub fn new(movie_id: i64, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            identity: Uuid::new_v4().to_string(),
            movie_id,
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Category filter selection for catalog queries.
///
/// Each dimension is independently toggleable; a query with all three disabled
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilters {
    #[serde(default)]
    pub favorites: bool,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub toprated: bool,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            favorites: false,
            popular: true,
            toprated: true,
        }
    }
}

impl CatalogFilters {
    pub fn all() -> Self {
        Self {
            favorites: true,
            popular: true,
            toprated: true,
        }
    }

    pub fn none_enabled(&self) -> bool {
        !self.favorites && !self.popular && !self.toprated
    }
}

/// Store statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_movies: u64,
    pub total_videos: u64,
    pub total_reviews: u64,
    pub favorites: u64,
    /// When the stats snapshot was taken.
    pub taken_at: DateTime<Utc>,
}

/// Errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
