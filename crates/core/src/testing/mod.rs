//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the remote source traits,
//! allowing sync engine and server tests without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{MockCatalogSource, MockThumbnailSource, fixtures};
//!
//! let source = MockCatalogSource::new();
//! source.set_category(Category::Popular, vec![fixtures::movie(603, "The Matrix")]).await;
//!
//! // Use in a SyncEngine...
//! ```

mod mock_catalog_source;
mod mock_thumbnail_source;

pub use mock_catalog_source::{MockCatalogSource, RecordedFetch};
pub use mock_thumbnail_source::MockThumbnailSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::store::{MovieRecord, ReviewRecord, VideoRecord};

    /// Create a test movie record with reasonable defaults and no flags set.
    pub fn movie(id: i64, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            overview: format!("A movie about {}.", title.to_lowercase()),
            release_date: "2024-01-01".to_string(),
            vote_average: 7,
            vote_count: 1200,
            popularity: 42.5,
            poster_path: "/poster.jpg".to_string(),
            original_language: "en".to_string(),
            favorite: false,
            popular: false,
            toprated: false,
        }
    }

    /// Create a test movie carrying the popular flag.
    pub fn popular_movie(id: i64, title: &str) -> MovieRecord {
        let mut record = movie(id, title);
        record.popular = true;
        record
    }

    /// Create a test movie carrying the top-rated flag.
    pub fn toprated_movie(id: i64, title: &str) -> MovieRecord {
        let mut record = movie(id, title);
        record.toprated = true;
        record
    }

    /// Create an enriched trailer video for a movie.
    pub fn trailer(movie_id: i64, key: &str) -> VideoRecord {
        VideoRecord {
            identity: uuid::Uuid::new_v4().to_string(),
            movie_id,
            iso_639_1: "en".to_string(),
            iso_3166_1: "US".to_string(),
            key: key.to_string(),
            site: "YouTube".to_string(),
            size: 1080,
            kind: "Trailer".to_string(),
            image_url: Some(format!("https://img.example/{}/medium.jpg", key)),
        }
    }

    /// Create a test review for a movie.
    pub fn review(movie_id: i64, author: &str) -> ReviewRecord {
        ReviewRecord::new(
            movie_id,
            author.to_string(),
            format!("{} thought this was watchable.", author),
        )
    }
}
