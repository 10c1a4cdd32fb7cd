//! Mock thumbnail lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::remote::{RemoteError, ThumbnailSource};

/// Mock implementation of the ThumbnailSource trait.
///
/// Keys without a configured URL fail their lookup, which is how tests
/// exercise the skip-on-failure path of trailer enrichment.
#[derive(Debug)]
pub struct MockThumbnailSource {
    /// Thumbnail URLs by provider key.
    urls: Arc<RwLock<HashMap<String, String>>>,
    /// Recorded lookup keys.
    lookups: Arc<RwLock<Vec<String>>>,
}

impl Default for MockThumbnailSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockThumbnailSource {
    /// Create a new empty mock thumbnail source.
    pub fn new() -> Self {
        Self {
            urls: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Configure the URL returned for a key.
    pub async fn set_url(&self, key: &str, url: &str) {
        self.urls
            .write()
            .await
            .insert(key.to_string(), url.to_string());
    }

    /// Get all recorded lookup keys.
    pub async fn recorded_lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl ThumbnailSource for MockThumbnailSource {
    async fn thumbnail_url(&self, key: &str) -> Result<String, RemoteError> {
        self.lookups.write().await.push(key.to_string());

        self.urls
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| RemoteError::ParseError(format!("no medium thumbnail for key {}", key)))
    }
}
