//! PostgreSQL-backed document store.
//!
//! Each collection is a table of JSONB documents keyed by UUID. Table
//! names only ever come from the fixed [`Collection`] table; field names
//! and values in filters are always bound parameters.

use std::sync::Arc;

use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{Clause, Document, DocumentStore, Filter, StoreFuture, StoredDocument};
use crate::{error::StoreResult, models::Collection};

/// Document store over a shared PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    /// Creates a store using the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    #[instrument(
        name = "store_insert",
        skip(self, collection, document),
        fields(collection = %collection)
    )]
    async fn insert_impl(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreResult<StoredDocument> {
        let id = Uuid::new_v4();
        let sql = format!("INSERT INTO {} (id, document) VALUES ($1, $2)", collection.name());

        sqlx::query(&sql).bind(id).bind(Json(&document)).execute(&*self.pool).await?;

        debug!(id = %id, "Document inserted");
        Ok(StoredDocument { id, fields: document })
    }

    #[instrument(
        name = "store_find",
        skip(self, collection, filter),
        fields(collection = %collection)
    )]
    async fn find_impl(
        &self,
        collection: Collection,
        filter: Filter,
        limit: u32,
    ) -> StoreResult<Vec<StoredDocument>> {
        let mut query = find_query(collection, &filter, limit);
        let rows: Vec<(Uuid, Json<Document>)> =
            query.build_query_as().fetch_all(&*self.pool).await?;

        debug!(count = rows.len(), "Documents fetched");
        Ok(rows.into_iter().map(|(id, Json(fields))| StoredDocument { id, fields }).collect())
    }

    async fn ensure_collections_impl(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            sqlx::query(&create_table_sql(collection)).execute(&*self.pool).await?;
            sqlx::query(&create_index_sql(collection)).execute(&*self.pool).await?;
        }
        Ok(())
    }
}

impl DocumentStore for PostgresDocumentStore {
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreFuture<'_, StoredDocument> {
        Box::pin(self.insert_impl(collection, document))
    }

    fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: u32,
    ) -> StoreFuture<'_, Vec<StoredDocument>> {
        Box::pin(self.find_impl(collection, filter, limit))
    }

    fn ensure_collections(&self) -> StoreFuture<'_, ()> {
        Box::pin(self.ensure_collections_impl())
    }
}

fn create_table_sql(collection: Collection) -> String {
    format!(
        r"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            document JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        ",
        collection.name()
    )
}

fn create_index_sql(collection: Collection) -> String {
    let table = collection.name();
    format!("CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table} (created_at, id)")
}

/// Builds the list query for one collection.
fn find_query(
    collection: Collection,
    filter: &Filter,
    limit: u32,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT id, document FROM {}", collection.name()));

    for (index, clause) in filter.clauses().iter().enumerate() {
        query.push(if index == 0 { " WHERE " } else { " AND " });
        match clause {
            Clause::Equals { field, value } => {
                query.push("document ->> ");
                query.push_bind(*field);
                query.push(" = ");
                query.push_bind(value.clone());
            },
            Clause::Contains { field, value } => {
                query.push("document -> ");
                query.push_bind(*field);
                query.push(" @> jsonb_build_array(");
                query.push_bind(value.clone());
                query.push("::text)");
            },
        }
    }

    query.push(" ORDER BY created_at, id LIMIT ");
    query.push_bind(i64::from(limit));
    query
}
