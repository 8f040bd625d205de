//! Document store abstraction.
//!
//! The service is a thin layer over a document-oriented store offering
//! two operations: append a document to a collection, and read back
//! documents matching a simple filter. The `DocumentStore` trait is the
//! seam between request handling and persistence so handlers run the same
//! against PostgreSQL in production and the in-memory store in tests.
//!
//! Every operation touches exactly one collection with a single write or a
//! single read; there are no transactions and no updates.

use std::{future::Future, pin::Pin};

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{error::StoreResult, models::Collection};

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

/// Flat mapping of field names to values.
pub type Document = Map<String, Value>;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// A document together with its store-generated identifier.
///
/// Serializes as the document's fields plus `"id"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDocument {
    /// Identifier assigned at insert time.
    pub id: Uuid,
    /// Stored fields.
    #[serde(flatten)]
    pub fields: Document,
}

/// One condition on a document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// String field equals the value.
    Equals {
        /// Field name
        field: &'static str,
        /// Expected value
        value: String,
    },
    /// String-array field contains the value.
    Contains {
        /// Field name
        field: &'static str,
        /// Element that must be present
        value: String,
    },
}

impl Clause {
    fn matches(&self, document: &Document) -> bool {
        match self {
            Self::Equals { field, value } => {
                document.get(*field).and_then(Value::as_str) == Some(value.as_str())
            },
            Self::Contains { field, value } => document
                .get(*field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(value.as_str()))),
        }
    }
}

/// Conjunction of clauses. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Filter matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an equality clause when `value` is present.
    #[must_use]
    pub fn equals(mut self, field: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.clauses.push(Clause::Equals { field, value: value.to_string() });
        }
        self
    }

    /// Adds a membership clause when `value` is present.
    #[must_use]
    pub fn contains(mut self, field: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.clauses.push(Clause::Contains { field, value: value.to_string() });
        }
        self
    }

    /// Clauses in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true if the document satisfies every clause.
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|clause| clause.matches(document))
    }
}

/// Persistence operations the API depends on.
///
/// Implementations must assign a fresh, never reused identifier on every
/// insert and return documents from `find` in insertion order.
pub trait DocumentStore: Send + Sync + 'static {
    /// Appends a document to a collection and returns it with its new id.
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreFuture<'_, StoredDocument>;

    /// Returns up to `limit` documents of a collection matching `filter`.
    fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: u32,
    ) -> StoreFuture<'_, Vec<StoredDocument>>;

    /// Creates backing storage for every collection if it does not exist.
    fn ensure_collections(&self) -> StoreFuture<'_, ()>;
}
