//! Catalog and sub-resource synchronization.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use super::SyncError;
use crate::events::{ChangeKind, ChangeNotifier};
use crate::metrics;
use crate::remote::{CatalogSource, Category};
use crate::store::{MovieRecord, MovieStore, ReviewRecord, StoreError, VideoRecord};

/// Result of a catalog sync or refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether the remote catalog was actually fetched.
    pub fetched: bool,
    /// Number of movie records written.
    pub upserted: usize,
}

/// Videos and reviews of one movie, as served from the store.
#[derive(Debug, Clone)]
pub struct SubResources {
    pub videos: Vec<VideoRecord>,
    pub reviews: Vec<ReviewRecord>,
    /// Whether the data was served without a remote fetch.
    pub from_cache: bool,
}

/// The write path between the remote catalog and the store.
///
/// Concurrency model:
/// - `catalog_gate` serializes whole-catalog operations, so concurrent
///   `ensure_catalog` calls against an empty store produce one fetch.
/// - `movie_locks` serializes per-movie operations by id; work on distinct
///   movies proceeds in parallel. An entry lives only while some task uses
///   it and is dropped once the last user releases it.
/// - `resolved` marks movies whose sub-resources were fetched in this
///   process. The mark is permanent until restart and is never set when the
///   fetch failed, so a failed movie is retried on the next request.
pub struct SyncEngine {
    store: Arc<dyn MovieStore>,
    source: Arc<dyn CatalogSource>,
    notifier: ChangeNotifier,
    catalog_gate: AsyncMutex<()>,
    movie_locks: StdMutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
    resolved: StdMutex<HashSet<i64>>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn MovieStore>,
        source: Arc<dyn CatalogSource>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            store,
            source,
            notifier,
            catalog_gate: AsyncMutex::new(()),
            movie_locks: StdMutex::new(HashMap::new()),
            resolved: StdMutex::new(HashSet::new()),
        }
    }

    /// Populate the base catalog if the store is empty.
    ///
    /// A non-empty store is taken as-is: no fetch, no writes. Holding the
    /// catalog gate across the emptiness check and the writes means
    /// concurrent callers cannot both observe an empty store.
    pub async fn ensure_catalog(&self) -> Result<SyncOutcome, SyncError> {
        let _gate = self.catalog_gate.lock().await;

        if !self.store.is_empty()? {
            debug!("Catalog already populated, skipping sync");
            metrics::CATALOG_SYNCS.with_label_values(&["cached"]).inc();
            return Ok(SyncOutcome {
                fetched: false,
                upserted: 0,
            });
        }

        match self.fetch_all_categories().await {
            Ok(upserted) => {
                info!("Catalog synced, {} movies written", upserted);
                metrics::CATALOG_SYNCS.with_label_values(&["fetched"]).inc();
                self.notifier.publish(ChangeKind::CatalogSynced);
                Ok(SyncOutcome {
                    fetched: true,
                    upserted,
                })
            }
            Err(e) => {
                warn!("Catalog sync failed: {}", e);
                metrics::CATALOG_SYNCS.with_label_values(&["failed"]).inc();
                Err(e)
            }
        }
    }

    /// Refetch the base catalog unconditionally.
    ///
    /// Existing flags survive the refresh through the merge-on-write path,
    /// favorites in particular.
    pub async fn refresh_catalog(&self) -> Result<SyncOutcome, SyncError> {
        let _gate = self.catalog_gate.lock().await;

        match self.fetch_all_categories().await {
            Ok(upserted) => {
                info!("Catalog refreshed, {} movies written", upserted);
                metrics::CATALOG_SYNCS.with_label_values(&["fetched"]).inc();
                self.notifier.publish(ChangeKind::CatalogSynced);
                Ok(SyncOutcome {
                    fetched: true,
                    upserted,
                })
            }
            Err(e) => {
                warn!("Catalog refresh failed: {}", e);
                metrics::CATALOG_SYNCS.with_label_values(&["failed"]).inc();
                Err(e)
            }
        }
    }

    /// Serve videos and reviews for a movie, fetching them once on demand.
    ///
    /// A movie counts as resolved when it was fetched in this process, or
    /// when a warm store already holds both record kinds for it. A failed
    /// fetch leaves the movie unresolved so the next request retries.
    pub async fn ensure_sub_resources(&self, movie_id: i64) -> Result<SubResources, SyncError> {
        let lock = self.movie_lock(movie_id);
        let result = {
            let _guard = lock.lock().await;
            self.ensure_sub_resources_locked(movie_id).await
        };
        self.release_movie_lock(movie_id, &lock);
        result
    }

    async fn ensure_sub_resources_locked(&self, movie_id: i64) -> Result<SubResources, SyncError> {
        let videos = self.store.get_videos(movie_id)?;
        let reviews = self.store.get_reviews(movie_id)?;

        let already_resolved = self.is_resolved(movie_id);
        if already_resolved || (!videos.is_empty() && !reviews.is_empty()) {
            debug!("Sub-resources for movie {} served from cache", movie_id);
            metrics::SUBRESOURCE_RESOLUTIONS
                .with_label_values(&["hit"])
                .inc();
            return Ok(SubResources {
                videos,
                reviews,
                from_cache: true,
            });
        }

        metrics::SUBRESOURCE_RESOLUTIONS
            .with_label_values(&["miss"])
            .inc();

        match self.resolve_sub_resources(movie_id).await {
            Ok(()) => {
                self.mark_resolved(movie_id);
                self.notifier
                    .publish(ChangeKind::SubResourcesResolved { movie_id });
                Ok(SubResources {
                    videos: self.store.get_videos(movie_id)?,
                    reviews: self.store.get_reviews(movie_id)?,
                    from_cache: false,
                })
            }
            Err(e) => {
                warn!("Sub-resource fetch failed for movie {}: {}", movie_id, e);
                metrics::SUBRESOURCE_RESOLUTIONS
                    .with_label_values(&["failed"])
                    .inc();
                Err(e)
            }
        }
    }

    /// Flip a movie's favorite flag and return the updated record.
    pub async fn toggle_favorite(&self, movie_id: i64) -> Result<MovieRecord, SyncError> {
        let lock = self.movie_lock(movie_id);
        let result = {
            let _guard = lock.lock().await;
            self.toggle_favorite_locked(movie_id)
        };
        self.release_movie_lock(movie_id, &lock);
        result
    }

    fn toggle_favorite_locked(&self, movie_id: i64) -> Result<MovieRecord, SyncError> {
        let mut record = self.store.get_movie(movie_id)?;
        record.favorite = !record.favorite;
        self.store.upsert_movie(&record)?;

        info!(
            "Movie {} favorite set to {}",
            movie_id, record.favorite
        );
        metrics::FAVORITE_TOGGLES.inc();
        self.notifier.publish(ChangeKind::FavoriteToggled { movie_id });

        Ok(record)
    }

    /// Fetch both category lists and merge every record into the store.
    async fn fetch_all_categories(&self) -> Result<usize, SyncError> {
        let mut upserted = 0;

        for category in Category::all() {
            let records = self.source.fetch_category(category).await.map_err(|e| {
                metrics::REMOTE_FAILURES.with_label_values(&["category"]).inc();
                e
            })?;
            debug!("Category {} fetched {} movies", category, records.len());

            for record in records {
                self.merge_upsert(record)?;
                upserted += 1;
            }
        }

        Ok(upserted)
    }

    /// Write a fetched record, preserving flags already set on an existing
    /// row with the same id.
    fn merge_upsert(&self, record: MovieRecord) -> Result<(), SyncError> {
        match self.store.get_movie(record.id) {
            Ok(existing) => self.store.upsert_movie(&record.union_flags(&existing))?,
            Err(StoreError::NotFound(_)) => self.store.upsert_movie(&record)?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Fetch and persist both sub-resource kinds for a movie.
    ///
    /// Writes are per-record, so a failure in the second batch leaves the
    /// first batch committed. The movie stays unresolved in that case.
    async fn resolve_sub_resources(&self, movie_id: i64) -> Result<(), SyncError> {
        let videos = self.source.fetch_videos(movie_id).await.map_err(|e| {
            metrics::REMOTE_FAILURES.with_label_values(&["videos"]).inc();
            e
        })?;
        for video in &videos {
            self.store.upsert_video(video)?;
        }

        let reviews = self.source.fetch_reviews(movie_id).await.map_err(|e| {
            metrics::REMOTE_FAILURES.with_label_values(&["reviews"]).inc();
            e
        })?;
        for review in &reviews {
            self.store.upsert_review(review)?;
        }

        debug!(
            "Resolved movie {}: {} videos, {} reviews",
            movie_id,
            videos.len(),
            reviews.len()
        );
        Ok(())
    }

    fn movie_lock(&self, movie_id: i64) -> Arc<AsyncMutex<()>> {
        let mut locks = self.movie_locks.lock().unwrap();
        locks
            .entry(movie_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Drop the per-movie lock entry once the caller is its last user.
    ///
    /// Two strong counts mean the map and the caller hold the only clones.
    /// The map mutex is held across the check, so a racing `movie_lock`
    /// cannot clone the entry between the count and the removal.
    fn release_movie_lock(&self, movie_id: i64, lock: &Arc<AsyncMutex<()>>) {
        let mut locks = self.movie_locks.lock().unwrap();
        if Arc::strong_count(lock) == 2 {
            locks.remove(&movie_id);
        }
    }

    fn is_resolved(&self, movie_id: i64) -> bool {
        self.resolved.lock().unwrap().contains(&movie_id)
    }

    fn mark_resolved(&self, movie_id: i64) {
        self.resolved.lock().unwrap().insert(movie_id);
    }
}
