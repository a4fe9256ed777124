/// Common test utilities for API integration tests
///
/// Builds the full router over the in-memory store so the suite runs
/// without a database, and provides helpers for issuing JSON requests
/// and registering accounts.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig};
use taskhub_shared::store::memory::InMemoryStore;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

/// Test context holding the router and the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestContext {
    /// Builds a fresh application over an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: TEST_JWT_SECRET.to_string(),
                token_ttl_hours: 1,
            },
        };

        let state = AppState::new(store.clone(), config);

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a JSON request and returns the status plus parsed body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Registers an account and returns its bearer token and user id
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .request(
                "POST",
                "/v1/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "password123",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }
}
