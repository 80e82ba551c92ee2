//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling comprehensive E2E testing
//! without external infrastructure.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use acervo_core::{
    testing::{MockCatalogStore, MockPriceSource, MockProvider},
    CatalogConfig, Config, FileStoreConfig, MetadataConfig, MetadataResolver, PriceScraperConfig,
    ServerConfig, StoreBackend, StoreConfig,
};

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Persistence (MockCatalogStore)
/// - Price scraping (MockPriceSource)
/// - Metadata lookup (MockProvider behind a real resolver)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list_items() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.get("/api/v1/items").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock store - seed and inspect the persisted dataset
    pub store: Arc<MockCatalogStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_mocks(MockPriceSource::new(), Vec::new()).await
    }

    /// Create a test fixture with a configured price source and metadata
    /// providers (tried in order by the resolver).
    pub async fn with_mocks(price_source: MockPriceSource, providers: Vec<MockProvider>) -> Self {
        let store = Arc::new(MockCatalogStore::new());

        let config = Config {
            server: ServerConfig::default(),
            store: StoreConfig {
                backend: StoreBackend::File,
                github: None,
                file: Some(FileStoreConfig {
                    // Never touched: the mock store is injected below.
                    path: PathBuf::from("catalog.csv"),
                }),
            },
            catalog: CatalogConfig::default(),
            metadata: MetadataConfig::default(),
            pricing: PriceScraperConfig {
                request_delay_ms: 0,
                ..Default::default()
            },
        };

        let resolver = Arc::new(MetadataResolver::new(
            providers
                .into_iter()
                .map(|p| Box::new(p) as Box<dyn acervo_core::MetadataProvider>)
                .collect(),
        ));

        let state = Arc::new(acervo_server::state::AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn acervo_core::CatalogStore>,
            resolver,
            Arc::new(price_source),
        ));

        let router = acervo_server::api::create_router(state);

        Self { router, store }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a POST request with a raw CSV body (for the import endpoint).
    pub async fn post_csv(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body, "text/csv").await
    }

    /// Send a request with raw string body and custom content type.
    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
