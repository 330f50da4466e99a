//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use quizbox_api::{AUTH_TOKEN_HEADER, AppState, build_app};
use quizbox_auth::{
    CredentialStore, IssuedToken, JwtEncoder, MemoryCredentialStore, PasswordHasher,
};
use quizbox_core::config::AppConfig;
use quizbox_core::config::auth::AuthConfig;
use quizbox_entity::session::CreateSession;
use quizbox_entity::user::{CreateUser, UserStatus};

/// Test application context
pub struct TestApp {
    /// The Axum app under test
    pub router: Router,
    /// Backing store, for seeding and inspection
    pub store: Arc<MemoryCredentialStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with an empty store
    pub fn new() -> Self {
        let config = AppConfig {
            auth: AuthConfig {
                jwt_secret: "integration-test-secret".into(),
                password_hash_iterations: 1_000,
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        };

        let store = Arc::new(MemoryCredentialStore::new());
        let state =
            AppState::new(config.clone(), store.clone()).expect("Failed to build app state");

        Self {
            router: build_app(state),
            store,
            config,
        }
    }

    /// Create a user directly in the store and return their ID
    pub async fn create_test_user(&self, email: &str, password: &str, status: UserStatus) -> i64 {
        let hash = PasswordHasher::from_config(&self.config.auth).hash_password(password);
        self.store
            .create_user(&CreateUser {
                first_name: "Test".into(),
                last_name: "User".into(),
                email: email.into(),
                password_hash: hash,
                status,
            })
            .await
            .expect("Failed to create test user")
            .id
    }

    /// Create a live session row for `user_id` without going through login
    pub async fn create_test_session(&self, user_id: i64) -> i64 {
        self.store
            .create_session(&CreateSession {
                user_id,
                ip_address: "192.0.2.10".into(),
                user_agent: "integration-test".into(),
                last_refreshed_at: Utc::now(),
                expires_at: None,
            })
            .await
            .expect("Failed to create test session")
            .id
    }

    /// Sign a token with the app's key as if issued at `issued_at`
    pub fn issue_token(
        &self,
        session_id: i64,
        user_id: i64,
        status: UserStatus,
        issued_at: DateTime<Utc>,
    ) -> IssuedToken {
        JwtEncoder::new(&self.config.auth)
            .expect("Failed to build encoder")
            .issue(session_id, user_id, status, issued_at)
            .expect("Failed to issue token")
    }

    /// Login and return the session token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .request("POST", "/api/v1/users/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .header(AUTH_TOKEN_HEADER)
            .expect("No X-Auth-Token in login response")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header(AUTH_TOKEN_HEADER, token);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty or not JSON
    pub body: Value,
}

impl TestResponse {
    /// A header value as an owned string
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    /// The envelope's `message` field
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}
