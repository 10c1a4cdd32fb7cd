//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock remote sources injected, enabling comprehensive E2E testing
//! without external infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use marquee_core::{
    load_config_from_str, CatalogView, ChangeNotifier, MovieStore, SqliteStore, SyncEngine,
    testing::MockCatalogSource,
};

/// Re-export fixtures for test convenience
pub use marquee_core::testing::fixtures;

/// Test fixture for E2E testing with a mock remote catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list_catalog() {
///     let fixture = TestFixture::new().await;
///     fixture.source.set_category(Category::Popular, vec![...]).await;
///
///     let response = fixture.get("/api/v1/catalog").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock remote catalog - configure category lists, videos, reviews
    pub source: Arc<MockCatalogSource>,
    /// The underlying store, for direct seeding and assertions
    pub store: Arc<SqliteStore>,
    /// Temporary directory holding the test database
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty store and empty mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = load_config_from_str(&format!(
            r#"
[server]
host = "127.0.0.1"
port = 0

[database]
path = "{}"

[tmdb]
api_key = "test-tmdb-key"

[youtube]
api_key = "test-yt-key"
"#,
            db_path.display()
        ))
        .expect("Failed to build test config");

        let store = Arc::new(SqliteStore::new(&db_path).expect("Failed to create store"));
        let source = Arc::new(MockCatalogSource::new());

        let notifier = ChangeNotifier::new();
        let engine = Arc::new(SyncEngine::new(
            store.clone() as Arc<dyn MovieStore>,
            source.clone(),
            notifier.clone(),
        ));
        let view = CatalogView::new(store.clone() as Arc<dyn MovieStore>, notifier);

        let state = Arc::new(marquee_server::state::AppState::new(config, engine, view));
        let router = marquee_server::api::create_router(state);

        Self {
            router,
            source,
            store,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };

        TestResponse { status, body }
    }
}
