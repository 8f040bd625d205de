//! Request timeout enforcement.

#![allow(clippy::unwrap_used)]

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use outbound_api::{create_router_with_timeout, AppState};
use outbound_core::{
    storage::StoreFuture, Collection, Document, DocumentStore, Filter, MemoryDocumentStore,
    StoredDocument,
};
use tower::ServiceExt;

/// Store whose reads stall before delegating.
struct SlowStore {
    inner: MemoryDocumentStore,
    delay: Duration,
}

impl DocumentStore for SlowStore {
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreFuture<'_, StoredDocument> {
        self.inner.insert(collection, document)
    }

    fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: u32,
    ) -> StoreFuture<'_, Vec<StoredDocument>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.inner.find(collection, filter, limit).await
        })
    }

    fn ensure_collections(&self) -> StoreFuture<'_, ()> {
        self.inner.ensure_collections()
    }
}

fn router(delay: Duration) -> axum::Router {
    let store = SlowStore { inner: MemoryDocumentStore::new(), delay };
    create_router_with_timeout(AppState::new(Arc::new(store)), Duration::from_millis(50))
}

#[tokio::test]
async fn slow_request_times_out_with_408() {
    let request = Request::get("/campaigns").body(Body::empty()).unwrap();

    let response = router(Duration::from_secs(5)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn fast_request_is_unaffected() {
    let request = Request::get("/campaigns").body(Body::empty()).unwrap();

    let response = router(Duration::ZERO).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
