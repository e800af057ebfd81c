//! Router-level test harness over the in-memory stores.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    artworks::{memory::MemoryArtworkStore, repo::ArtworkStore},
    auth::{jwt::JwtKeys, repo::MemoryUserStore},
    config::{AppConfig, JwtConfig},
    state::AppState,
};

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        },
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_artworks(Arc::new(MemoryArtworkStore::default()))
    }

    pub fn with_artworks(artworks: Arc<dyn ArtworkStore>) -> Self {
        let state = AppState::from_parts(
            JwtKeys::new(&test_config().jwt),
            artworks,
            Arc::new(MemoryUserStore::default()),
        );
        let router = build_app(state.clone());
        Self { state, router }
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.state.jwt.sign_access(user_id).expect("sign access token")
    }
}

/// Sends one request through the router; non-JSON bodies come back as a string value.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(body) => {
            send_raw(router, method, uri, token, Some("application/json"), body.to_string()).await
        }
        None => send_raw(router, method, uri, token, None, String::new()).await,
    }
}

/// Like [`send`], with full control over the body bytes and Content-Type.
pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        req = req.header(header::CONTENT_TYPE, content_type);
    }
    let req = req.body(Body::from(body)).expect("build request");

    let res = router.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
