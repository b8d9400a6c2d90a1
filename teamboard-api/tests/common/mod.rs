//! Common test utilities for API tests
//!
//! Builds the full router over a fresh in-memory store, so tests need no
//! database, and offers helpers for registering users and sending JSON
//! requests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use teamboard_api::app::{build_router, AppState};
use teamboard_api::config::{ApiConfig, Config, JwtSettings};
use teamboard_shared::store::MemoryStore;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and its store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub config: Config,
}

/// A registered user and their access token
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
    pub refresh_token: String,
}

/// Status, headers and parsed body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub fn test_config(production: bool) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production,
        },
        database: None,
        jwt: JwtSettings {
            secret: TEST_SECRET.to_string(),
            access_ttl_hours: 1,
            refresh_ttl_days: 1,
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config(false))
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());

        Self {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request and parses the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        into_test_response(response).await
    }

    /// Sends a request with a raw (possibly malformed) JSON body
    pub async fn send_raw(&self, method: &str, uri: &str, token: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        into_test_response(response).await
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.send("GET", uri, Some(&user.token), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> TestResponse {
        self.send("POST", uri, Some(&user.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Value) -> TestResponse {
        self.send("PUT", uri, Some(&user.token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.send("DELETE", uri, Some(&user.token), None).await
    }

    /// Registers a user through the API
    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "password123",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let data = &response.body["data"];
        TestUser {
            id: data["user"]["id"].as_str().unwrap().parse().unwrap(),
            username: username.to_string(),
            token: data["accessToken"].as_str().unwrap().to_string(),
            refresh_token: data["refreshToken"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project owned by `owner` and returns its id
    pub async fn create_project(&self, owner: &TestUser, name: &str) -> String {
        let response = self
            .post("/api/projects", owner, json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Adds `user` to a project and returns the membership id
    pub async fn add_member(&self, actor: &TestUser, project_id: &str, user: &TestUser, role: &str) -> String {
        let response = self
            .post(
                &format!("/api/projects/{project_id}/members"),
                actor,
                json!({ "userId": user.id, "role": role }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Creates a task and returns its id
    pub async fn create_task(&self, actor: &TestUser, project_id: &str, title: &str) -> String {
        let response = self
            .post(
                &format!("/api/projects/{project_id}/tasks"),
                actor,
                json!({ "title": title }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }
}

async fn into_test_response(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
