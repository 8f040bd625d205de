//! Store round-trip and liveness endpoint tests.

#![allow(clippy::unwrap_used)]

mod common;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::http::StatusCode;
use common::TestApp;
use outbound_core::Collection;
use serde_json::json;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    Layer,
};

/// Counts error-level events emitted by this crate.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::ERROR && metadata.target().starts_with("outbound_api") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn ping_writes_health_document() {
    let app = TestApp::new();

    let (status, body) = app.get("/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let documents = app.store.documents(Collection::Health).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].fields["status"], "ok");
    assert_eq!(documents[0].fields["timestamp"], "2024-03-01T12:00:00+00:00");
}

#[tokio::test]
async fn each_ping_is_a_new_document() {
    let app = TestApp::new();

    app.get("/test").await;
    app.clock.advance(Duration::from_secs(90));
    app.get("/test").await;

    let documents = app.store.documents(Collection::Health).await;
    assert_eq!(documents.len(), 2);
    assert_ne!(documents[0].id, documents[1].id);
    assert_eq!(documents[1].fields["timestamp"], "2024-03-01T12:01:30+00:00");
}

#[tokio::test]
async fn unreachable_store_is_server_error() {
    let app = TestApp::new();
    app.store.set_unavailable(Some("connection refused")).await;

    let (status, body) = app.get("/test").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "E3001");
    assert!(body["error"]["message"].as_str().unwrap().contains("connection refused"));
    assert!(body["error"].get("fields").is_none());
}

#[tokio::test]
async fn failed_ping_is_logged_once() {
    let errors = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new();
    app.store.set_unavailable(Some("connection refused")).await;

    let (status, _) = app.get("/test").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_write_is_server_error() {
    let app = TestApp::new();
    app.store.fail_next("disk full").await;

    let (status, body) = app.get("/test").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "E3002");
    assert_eq!(app.count(Collection::Health).await, 0);
}

#[tokio::test]
async fn liveness_does_not_touch_store() {
    let app = TestApp::new();
    app.store.set_unavailable(Some("connection refused")).await;

    let (status, body) = app.get("/live").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
    assert_eq!(body["service"], "outbound-api");
    assert_eq!(body["timestamp"], "2024-03-01T12:00:00Z");
}

#[tokio::test]
async fn concurrent_pings_all_succeed() {
    let app = TestApp::new();

    let responses = futures::future::join_all((0..10).map(|_| app.get("/test"))).await;

    assert!(responses.iter().all(|(status, _)| *status == StatusCode::OK));
    assert_eq!(app.count(Collection::Health).await, 10);
}
