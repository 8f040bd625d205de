//! Shared test environment for driving the router in-process.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use outbound_api::{create_router, AppState};
use outbound_core::{Collection, MemoryDocumentStore, TestClock};
use serde_json::Value;
use tower::ServiceExt;

/// Router over an in-memory store with a fixed clock.
pub struct TestApp {
    pub store: MemoryDocumentStore,
    pub clock: TestClock,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryDocumentStore::new();
        let clock =
            TestClock::with_start_time(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let state = AppState::new(Arc::new(store.clone())).with_clock(Arc::new(clock.clone()));

        Self { store, clock, router: create_router(state) }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("request failed");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body read failed").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body should be JSON")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    pub async fn count(&self, collection: Collection) -> usize {
        self.store.count(collection).await
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Field names of the violations in an error body, in order.
pub fn violated_fields(body: &Value) -> Vec<String> {
    body["error"]["fields"]
        .as_array()
        .expect("error body should list fields")
        .iter()
        .map(|violation| violation["field"].as_str().unwrap().to_string())
        .collect()
}
