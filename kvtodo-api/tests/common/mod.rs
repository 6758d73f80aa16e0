//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Router over a fresh in-memory store
//! - Request builders with JSON bodies and session cookies
//! - Response helpers for status, cookies and JSON bodies
//! - A store that is down, for outage behavior

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use kvtodo_api::app::{build_router, AppState};
use kvtodo_api::config::Config;
use async_trait::async_trait;
use kvtodo_shared::store::{KvStore, MemoryStore, StoreError, StoreHandle};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with an empty store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = Config::for_test();

        let handle: StoreHandle = store.clone();
        let app = build_router(AppState::new(handle, config.clone()));

        TestContext { store, app, config }
    }

    /// Sends a request and returns the response
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a JSON request with an optional session token
    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        body: Value,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, self.cookie_header(token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Sends a request without a body
    pub async fn empty(&self, method: &str, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, self.cookie_header(token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Returns the Cookie header value carrying `token`
    pub fn cookie_header(&self, token: &str) -> String {
        format!("{}={}", self.config.session.cookie_name, token)
    }

    /// Registers a user and asserts success
    pub async fn register(&self, email: &str, name: &str, password: &str) -> Value {
        let response = self
            .json(
                "POST",
                "/api/register",
                serde_json::json!({ "email": email, "name": name, "password": password }),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    /// Logs in and returns the session token from the Set-Cookie header
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .json(
                "POST",
                "/api/login",
                serde_json::json!({ "email": email, "password": password }),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        session_token(&response, &self.config.session.cookie_name)
            .expect("login should set the session cookie")
    }

    /// Registers and logs in a fresh user, returning the session token
    pub async fn signed_in(&self) -> String {
        self.register("alice@example.com", "Alice", "pw123").await;
        self.login("alice@example.com", "pw123").await
    }
}

/// Store whose every command times out
pub struct DownStore;

#[async_trait]
impl KvStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn del(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn incr(&self, _key: &str) -> Result<i64, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn sadd(&self, _key: &str, _member: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn srem(&self, _key: &str, _member: &str) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn smembers(&self, _key: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn set_all_if_absent(&self, _entries: &[(String, Vec<u8>)]) -> Result<bool, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn ping(&self) -> Result<bool, StoreError> {
        Err(StoreError::Timeout)
    }
}

/// Router over a store that is down
pub fn outage_app() -> axum::Router {
    let handle: StoreHandle = Arc::new(DownStore);
    build_router(AppState::new(handle, Config::for_test()))
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Returns the raw Set-Cookie header, if any
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Extracts the session token from the Set-Cookie header
pub fn session_token(response: &Response<Body>, cookie_name: &str) -> Option<String> {
    let cookie = set_cookie(response)?;
    let first = cookie.split(';').next()?;
    let (name, value) = first.split_once('=')?;
    (name == cookie_name).then(|| value.to_string())
}
