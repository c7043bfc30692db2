//! Router harness for handler tests; requests go through `oneshot`, no
//! listener involved.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::server::{build_router, AppState, ServerConfig};
use crate::db::{MemoryStorage, Storage};

pub(crate) struct TestApp {
    router: Router,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self::with_config(Arc::new(MemoryStorage::new()), &ServerConfig::default())
    }

    pub(crate) fn with_config(storage: Arc<dyn Storage>, config: &ServerConfig) -> Self {
        let state = Arc::new(AppState::new(storage));
        Self {
            router: build_router(state, config),
        }
    }

    async fn created(&self, uri: &str, body: Value) -> Value {
        let (status, body) = send(self, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
        body
    }

    pub(crate) async fn user(&self, email: &str) -> Value {
        self.created("/users", json!({ "email": email })).await
    }

    pub(crate) async fn store(&self, name: &str, user_id: i32) -> Value {
        self.created("/stores", json!({ "name": name, "userId": user_id }))
            .await
    }

    pub(crate) async fn product(&self, name: &str, price: f64, store_id: i32) -> Value {
        self.created(
            "/products",
            json!({ "name": name, "price": price, "storeId": store_id }),
        )
        .await
    }
}

async fn dispatch(app: &TestApp, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Send a request with an optional JSON body; an empty response body
/// comes back as `Value::Null`.
pub(crate) async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let (status, bytes) = dispatch(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub(crate) async fn send_raw(
    app: &TestApp,
    method: &str,
    uri: &str,
    raw: &'static str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(raw))
        .unwrap();

    let (status, bytes) = dispatch(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub(crate) async fn get_text(app: &TestApp, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = dispatch(app, request).await;
    (status, String::from_utf8(bytes).unwrap())
}
