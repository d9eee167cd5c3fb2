/// Common test utilities for integration tests
///
/// Every test gets its own router backed by a fresh `MemoryStore`, so tests
/// are isolated and need no database:
/// - Router construction from a real `Config`
/// - Test user creation with ready-made bearer tokens
/// - Request helpers returning status and parsed JSON

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::Config;
use taskdesk_shared::models::NewUser;
use taskdesk_shared::store::memory::MemoryStore;
use taskdesk_shared::store::UserStore;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// A user inserted directly into the store
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestUser {
    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: MemoryStore,
    pub state: AppState,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a context with default settings (owned task listing)
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Creates a context with extra configuration variables
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = HashMap::from([
            ("STORAGE_BACKEND".to_string(), "memory".to_string()),
            ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ]);
        for (key, value) in vars {
            env.insert(key.to_string(), value.to_string());
        }

        let config = Config::from_lookup(|key| env.get(key).cloned()).expect("valid test config");

        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config);
        let app = build_router(state.clone());

        Self { store, state, app }
    }

    /// Inserts a user and mints a token for it, bypassing password hashing
    pub async fn create_user(&self, name: &str) -> TestUser {
        let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());
        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.clone(),
                password_hash: "test_hash".to_string(), // Not used in tests
            })
            .await
            .expect("create test user");

        let token = self.state.issuer.issue(user.id).expect("issue token").token;

        TestUser {
            id: user.id,
            email,
            token,
        }
    }

    /// Sends a request and returns the status and JSON body (`Null` if empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!(
                    "Expected JSON body, got {}: {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        (status, json)
    }

    /// Authenticated request as `user`
    pub async fn send_as(
        &self,
        user: &TestUser,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(method, uri, Some(&user.auth_header()), body)
            .await
    }

    /// Creates a task as `user` and returns its JSON
    pub async fn create_task(&self, user: &TestUser, body: Value) -> Value {
        let (status, task) = self.send_as(user, "POST", "/tasks", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", task);
        task
    }
}
