//! Sync engine - the write path between the remote catalog and the store.
//!
//! All mutations of the store go through [`SyncEngine`]; readers go through
//! the catalog view. The engine decides when a remote fetch is needed, merges
//! fetched records into what is already cached, and publishes a change event
//! after every successful write.

mod engine;

pub use engine::{SubResources, SyncEngine, SyncOutcome};

use thiserror::Error;

use crate::remote::RemoteError;
use crate::store::StoreError;

/// Errors surfaced by sync engine operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}
