//! Change notification from the sync engine to catalog view subscribers.
//!
//! Delivery is last-value-wins via a watch channel: current subscribers see
//! the most recent change, missed updates are not buffered.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// What changed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Initial value before any change was published.
    Startup,
    /// The base catalog was populated or refreshed.
    CatalogSynced,
    /// Videos/reviews for a movie were resolved.
    SubResourcesResolved { movie_id: i64 },
    /// A movie's favorite flag was flipped.
    FavoriteToggled { movie_id: i64 },
}

/// A store change with its publication time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub at: DateTime<Utc>,
    pub kind: ChangeKind,
}

/// Handle for publishing store changes.
///
/// Cheaply cloneable; publishing never fails the caller even with no
/// subscribers attached.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: watch::Sender<StoreChange>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(StoreChange {
            at: Utc::now(),
            kind: ChangeKind::Startup,
        });
        Self { tx }
    }

    /// Publish a change to current subscribers.
    pub fn publish(&self, kind: ChangeKind) {
        // send_replace never fails; it just stores the value when no
        // receiver is listening.
        self.tx.send_replace(StoreChange {
            at: Utc::now(),
            kind,
        });
    }

    /// Subscribe to future changes.
    pub fn subscribe(&self) -> watch::Receiver<StoreChange> {
        self.tx.subscribe()
    }
}
