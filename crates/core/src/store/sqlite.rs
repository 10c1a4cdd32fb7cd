//! SQLite-backed movie store implementation.
//!
//! A single `Mutex<Connection>` serializes every operation, reads included.
//! Read concurrency is bounded by typical query times in the microsecond
//! range; a WAL-mode connection pool would lift that limit if it ever shows
//! up in practice.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{
    CatalogFilters, MovieRecord, MovieStore, ReviewRecord, StoreError, StoreStats, VideoRecord,
};

/// SQLite-backed movie store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Cached movie metadata (one row per remote movie id)
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                overview TEXT NOT NULL,
                release_date TEXT NOT NULL,
                vote_average INTEGER NOT NULL,
                vote_count INTEGER NOT NULL,
                popularity REAL NOT NULL,
                poster_path TEXT NOT NULL,
                original_language TEXT NOT NULL,
                favorite INTEGER NOT NULL DEFAULT 0,
                popular INTEGER NOT NULL DEFAULT 0,
                toprated INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_movies_favorite ON movies(favorite);
            CREATE INDEX IF NOT EXISTS idx_movies_popular ON movies(popular);
            CREATE INDEX IF NOT EXISTS idx_movies_toprated ON movies(toprated);

            -- Videos per movie (locally generated identity)
            CREATE TABLE IF NOT EXISTS videos (
                identity TEXT PRIMARY KEY,
                movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
                iso_639_1 TEXT NOT NULL,
                iso_3166_1 TEXT NOT NULL,
                key TEXT NOT NULL,
                site TEXT NOT NULL,
                size INTEGER NOT NULL,
                type TEXT NOT NULL,
                image_url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_videos_movie ON videos(movie_id);

            -- Reviews per movie (locally generated identity, append-only)
            CREATE TABLE IF NOT EXISTS reviews (
                identity TEXT PRIMARY KEY,
                movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
                author TEXT NOT NULL,
                content TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reviews_movie ON reviews(movie_id);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<MovieRecord> {
        Ok(MovieRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            overview: row.get(2)?,
            release_date: row.get(3)?,
            vote_average: row.get(4)?,
            vote_count: row.get(5)?,
            popularity: row.get(6)?,
            poster_path: row.get(7)?,
            original_language: row.get(8)?,
            favorite: row.get(9)?,
            popular: row.get(10)?,
            toprated: row.get(11)?,
        })
    }

    fn row_to_video(row: &rusqlite::Row) -> rusqlite::Result<VideoRecord> {
        Ok(VideoRecord {
            identity: row.get(0)?,
            movie_id: row.get(1)?,
            iso_639_1: row.get(2)?,
            iso_3166_1: row.get(3)?,
            key: row.get(4)?,
            site: row.get(5)?,
            size: row.get(6)?,
            kind: row.get(7)?,
            image_url: row.get(8)?,
        })
    }

    fn row_to_review(row: &rusqlite::Row) -> rusqlite::Result<ReviewRecord> {
        Ok(ReviewRecord {
            identity: row.get(0)?,
            movie_id: row.get(1)?,
            author: row.get(2)?,
            content: row.get(3)?,
        })
    }

    fn query_movie_rows(conn: &Connection, sql: &str) -> Result<Vec<MovieRecord>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_movie)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut movies = Vec::new();
        for row in rows {
            movies.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(movies)
    }
}

const MOVIE_COLUMNS: &str = "id, title, overview, release_date, vote_average, vote_count, \
                             popularity, poster_path, original_language, favorite, popular, toprated";

impl MovieStore for SqliteStore {
    fn upsert_movie(&self, record: &MovieRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO movies
             (id, title, overview, release_date, vote_average, vote_count, popularity,
              poster_path, original_language, favorite, popular, toprated)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.id,
                &record.title,
                &record.overview,
                &record.release_date,
                record.vote_average,
                record.vote_count,
                record.popularity,
                &record.poster_path,
                &record.original_language,
                record.favorite,
                record.popular,
                record.toprated,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_movie(&self, id: i64) -> Result<MovieRecord, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS),
            params![id],
            Self::row_to_movie,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(format!("movie {}", id)),
            _ => StoreError::Database(e.to_string()),
        })
    }

    fn delete_movie(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute("DELETE FROM movies WHERE id = ?", params![id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(format!("movie {}", id)));
        }

        Ok(())
    }

    fn query_movies(&self, filters: &CatalogFilters) -> Result<Vec<MovieRecord>, StoreError> {
        if filters.none_enabled() {
            return Ok(Vec::new());
        }

        let mut clauses = Vec::new();
        if filters.favorites {
            clauses.push("favorite = 1");
        }
        if filters.popular {
            clauses.push("popular = 1");
        }
        if filters.toprated {
            clauses.push("toprated = 1");
        }

        let sql = format!(
            "SELECT {} FROM movies WHERE {} ORDER BY id",
            MOVIE_COLUMNS,
            clauses.join(" OR ")
        );

        let conn = self.conn.lock().unwrap();
        Self::query_movie_rows(&conn, &sql)
    }

    fn all_movies(&self) -> Result<Vec<MovieRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        Self::query_movie_rows(
            &conn,
            &format!("SELECT {} FROM movies ORDER BY id", MOVIE_COLUMNS),
        )
    }

    fn is_empty(&self) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();

        let count: u64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(count == 0)
    }

    fn upsert_video(&self, record: &VideoRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO videos
             (identity, movie_id, iso_639_1, iso_3166_1, key, site, size, type, image_url)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &record.identity,
                record.movie_id,
                &record.iso_639_1,
                &record.iso_3166_1,
                &record.key,
                &record.site,
                record.size,
                &record.kind,
                &record.image_url,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT identity, movie_id, iso_639_1, iso_3166_1, key, site, size, type, image_url
                 FROM videos WHERE movie_id = ? ORDER BY identity",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![movie_id], Self::row_to_video)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut videos = Vec::new();
        for row in rows {
            videos.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(videos)
    }

    fn get_trailer_videos(&self, movie_id: i64) -> Result<Vec<VideoRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT identity, movie_id, iso_639_1, iso_3166_1, key, site, size, type, image_url
                 FROM videos WHERE movie_id = ? AND type = 'Trailer' ORDER BY identity",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![movie_id], Self::row_to_video)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut videos = Vec::new();
        for row in rows {
            videos.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(videos)
    }

    fn upsert_review(&self, record: &ReviewRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO reviews (identity, movie_id, author, content)
             VALUES (?, ?, ?, ?)",
            params![
                &record.identity,
                record.movie_id,
                &record.author,
                &record.content,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_reviews(&self, movie_id: i64) -> Result<Vec<ReviewRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT identity, movie_id, author, content
                 FROM reviews WHERE movie_id = ? ORDER BY identity",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![movie_id], Self::row_to_review)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(reviews)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = self.conn.lock().unwrap();

        let total_movies: u64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let total_videos: u64 = conn
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let total_reviews: u64 = conn
            .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let favorites: u64 = conn
            .query_row("SELECT COUNT(*) FROM movies WHERE favorite = 1", [], |row| {
                row.get(0)
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(StoreStats {
            total_movies,
            total_videos,
            total_reviews,
            favorites,
            taken_at: Utc::now(),
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            "DELETE FROM reviews;
             DELETE FROM videos;
             DELETE FROM movies;",
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    fn create_test_movie(id: i64, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            overview: "An overview".to_string(),
            release_date: "1999-03-30".to_string(),
            vote_average: 8,
            vote_count: 1500,
            popularity: 42.7,
            poster_path: "/poster.jpg".to_string(),
            original_language: "en".to_string(),
            favorite: false,
            popular: false,
            toprated: false,
        }
    }

    fn create_test_video(movie_id: i64, kind: &str) -> VideoRecord {
        VideoRecord {
            identity: Uuid::new_v4().to_string(),
            movie_id,
            iso_639_1: "en".to_string(),
            iso_3166_1: "US".to_string(),
            key: "dQw4w9WgXcQ".to_string(),
            site: "YouTube".to_string(),
            size: 1080,
            kind: kind.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_upsert_and_get_movie() {
        let store = create_test_store();
        let movie = create_test_movie(603, "The Matrix");

        store.upsert_movie(&movie).unwrap();

        let loaded = store.get_movie(603).unwrap();
        assert_eq!(loaded.title, "The Matrix");
        assert_eq!(loaded.vote_average, 8);
        assert_eq!(loaded.popularity, 42.7);
    }

    #[test]
    fn test_get_nonexistent_movie() {
        let store = create_test_store();
        let result = store.get_movie(999);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = create_test_store();

        store.upsert_movie(&create_test_movie(1, "Old Title")).unwrap();
        store.upsert_movie(&create_test_movie(1, "New Title")).unwrap();

        let all = store.all_movies().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "New Title");
    }

    #[test]
    fn test_upsert_is_blind_replace() {
        // The store does not merge flags; that is the caller's job.
        let store = create_test_store();

        let mut movie = create_test_movie(1, "Movie");
        movie.favorite = true;
        store.upsert_movie(&movie).unwrap();

        let plain = create_test_movie(1, "Movie");
        store.upsert_movie(&plain).unwrap();

        assert!(!store.get_movie(1).unwrap().favorite);
    }

    #[test]
    fn test_delete_movie() {
        let store = create_test_store();
        store.upsert_movie(&create_test_movie(1, "Movie")).unwrap();

        store.delete_movie(1).unwrap();

        assert!(matches!(store.get_movie(1), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_nonexistent_movie() {
        let store = create_test_store();
        let result = store.delete_movie(999);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_query_movies_by_flags() {
        let store = create_test_store();

        let mut popular = create_test_movie(1, "Popular");
        popular.popular = true;
        let mut toprated = create_test_movie(2, "TopRated");
        toprated.toprated = true;
        let mut favorite = create_test_movie(3, "Favorite");
        favorite.favorite = true;
        let unflagged = create_test_movie(4, "Unflagged");

        for m in [&popular, &toprated, &favorite, &unflagged] {
            store.upsert_movie(m).unwrap();
        }

        let only_popular = store
            .query_movies(&CatalogFilters {
                favorites: false,
                popular: true,
                toprated: false,
            })
            .unwrap();
        assert_eq!(only_popular.len(), 1);
        assert_eq!(only_popular[0].id, 1);

        let all_flagged = store.query_movies(&CatalogFilters::all()).unwrap();
        assert_eq!(all_flagged.len(), 3); // unflagged never matches
    }

    #[test]
    fn test_query_movies_no_flags_enabled() {
        let store = create_test_store();
        store.upsert_movie(&create_test_movie(1, "Movie")).unwrap();

        let results = store
            .query_movies(&CatalogFilters {
                favorites: false,
                popular: false,
                toprated: false,
            })
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_query_movies_multi_flag_record_appears_once() {
        let store = create_test_store();

        let mut movie = create_test_movie(42, "Both");
        movie.popular = true;
        movie.toprated = true;
        store.upsert_movie(&movie).unwrap();

        let results = store.query_movies(&CatalogFilters::all()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_is_empty() {
        let store = create_test_store();
        assert!(store.is_empty().unwrap());

        store.upsert_movie(&create_test_movie(1, "Movie")).unwrap();
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn test_videos_by_movie_and_trailer_filter() {
        let store = create_test_store();
        store.upsert_movie(&create_test_movie(42, "Movie")).unwrap();

        store.upsert_video(&create_test_video(42, "Trailer")).unwrap();
        store.upsert_video(&create_test_video(42, "Clip")).unwrap();
        store.upsert_video(&create_test_video(7, "Trailer")).unwrap();

        let all = store.get_videos(42).unwrap();
        assert_eq!(all.len(), 2);

        let trailers = store.get_trailer_videos(42).unwrap();
        assert_eq!(trailers.len(), 1);
        assert!(trailers[0].is_trailer());
    }

    #[test]
    fn test_video_image_url_round_trip() {
        let store = create_test_store();

        let mut video = create_test_video(42, "Trailer");
        video.image_url = Some("https://img.example/med.jpg".to_string());
        store.upsert_video(&video).unwrap();

        let loaded = store.get_videos(42).unwrap();
        assert_eq!(
            loaded[0].image_url.as_deref(),
            Some("https://img.example/med.jpg")
        );
    }

    #[test]
    fn test_reviews_append_without_dedup() {
        // Two reviews with the same author/content but distinct identities
        // both persist; the store has no dedup key for reviews.
        let store = create_test_store();

        store
            .upsert_review(&ReviewRecord::new(42, "alice", "great movie"))
            .unwrap();
        store
            .upsert_review(&ReviewRecord::new(42, "alice", "great movie"))
            .unwrap();

        let reviews = store.get_reviews(42).unwrap();
        assert_eq!(reviews.len(), 2);
    }

    #[test]
    fn test_stats() {
        let store = create_test_store();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_movies, 0);

        let mut movie = create_test_movie(1, "Movie");
        movie.favorite = true;
        store.upsert_movie(&movie).unwrap();
        store.upsert_video(&create_test_video(1, "Trailer")).unwrap();
        store
            .upsert_review(&ReviewRecord::new(1, "bob", "ok"))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_movies, 1);
        assert_eq!(stats.total_videos, 1);
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.favorites, 1);
    }

    #[test]
    fn test_clear() {
        let store = create_test_store();
        store.upsert_movie(&create_test_movie(1, "Movie")).unwrap();
        store.upsert_video(&create_test_video(1, "Trailer")).unwrap();

        store.clear().unwrap();

        assert!(store.is_empty().unwrap());
        assert!(store.get_videos(1).unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("marquee.db");

        {
            let store = SqliteStore::new(&db_path).unwrap();
            store.upsert_movie(&create_test_movie(603, "The Matrix")).unwrap();
        }

        let reopened = SqliteStore::new(&db_path).unwrap();
        assert_eq!(reopened.get_movie(603).unwrap().title, "The Matrix");
    }
}
