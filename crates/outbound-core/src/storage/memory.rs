//! In-memory document store.
//!
//! Deterministic store for tests and local runs without a database. Keeps
//! documents per collection in insertion order and supports injecting
//! failures so callers can exercise the server-error path.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, StoreFuture, StoredDocument};
use crate::{error::StoreError, models::Collection};

/// Store holding every collection in memory.
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions while the router owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<StoredDocument>>>>,
    unavailable: Arc<RwLock<Option<String>>>,
    next_failure: Arc<RwLock<Option<String>>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail as unreachable until cleared with `None`.
    pub async fn set_unavailable(&self, reason: Option<&str>) {
        *self.unavailable.write().await = reason.map(str::to_string);
    }

    /// Fails only the next operation with a store error.
    pub async fn fail_next(&self, message: &str) {
        *self.next_failure.write().await = Some(message.to_string());
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections.read().await.get(&collection).map_or(0, Vec::len)
    }

    /// Snapshot of a collection's documents in insertion order.
    pub async fn documents(&self, collection: Collection) -> Vec<StoredDocument> {
        self.collections.read().await.get(&collection).cloned().unwrap_or_default()
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        if let Some(reason) = self.unavailable.read().await.as_ref() {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        if let Some(message) = self.next_failure.write().await.take() {
            return Err(StoreError::Database(message));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreFuture<'_, StoredDocument> {
        Box::pin(async move {
            self.check_failure().await?;

            let stored = StoredDocument { id: Uuid::new_v4(), fields: document };
            self.collections.write().await.entry(collection).or_default().push(stored.clone());

            debug!(collection = %collection, id = %stored.id, "Document stored in memory");
            Ok(stored)
        })
    }

    fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: u32,
    ) -> StoreFuture<'_, Vec<StoredDocument>> {
        Box::pin(async move {
            self.check_failure().await?;

            let collections = self.collections.read().await;
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            let documents = collections
                .get(&collection)
                .map(|documents| {
                    documents
                        .iter()
                        .filter(|stored| filter.matches(&stored.fields))
                        .take(limit)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            Ok(documents)
        })
    }

    fn ensure_collections(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.check_failure().await?;

            let mut collections = self.collections.write().await;
            for collection in Collection::ALL {
                collections.entry(collection).or_default();
            }
            Ok(())
        })
    }
}
