//! Integration tests for the PostgreSQL document store.
//!
//! Runs the production store against the database named by
//! `DATABASE_URL`. Tests return early when it is unset. Each test tags its
//! documents with a fresh UUID and filters on it, so tests sharing the
//! tables do not see each other's rows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use outbound_core::{Collection, Document, DocumentStore, Filter, PostgresDocumentStore};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Serializes DDL; concurrent `CREATE TABLE IF NOT EXISTS` can race.
static DDL_LOCK: Mutex<()> = Mutex::const_new(());

async fn connect() -> Option<PostgresDocumentStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL store test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .expect("failed to connect to DATABASE_URL");
    let store = PostgresDocumentStore::new(pool);

    let _lock = DDL_LOCK.lock().await;
    store.ensure_collections().await.expect("failed to create collections");
    Some(store)
}

fn document(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

fn notes(documents: &[outbound_core::StoredDocument]) -> Vec<&str> {
    documents.iter().map(|d| d.fields["notes"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn ensure_collections_is_idempotent() {
    let Some(store) = connect().await else { return };

    let _lock = DDL_LOCK.lock().await;
    store.ensure_collections().await.unwrap();
    store.ensure_collections().await.unwrap();

    for collection in Collection::ALL {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(collection.name())
            .fetch_one(&*store.pool())
            .await
            .unwrap();
        assert!(exists, "table {collection} missing");
    }
}

#[tokio::test]
async fn insert_round_trips_document() {
    let Some(store) = connect().await else { return };
    let marker = Uuid::new_v4().to_string();
    let body = document(json!({
        "campaign_id": marker,
        "tags": ["a", "b"],
        "source": null,
    }));

    let stored = store.insert(Collection::LaunchInput, body.clone()).await.unwrap();
    let found = store
        .find(Collection::LaunchInput, Filter::all().equals("campaign_id", Some(&marker)), 50)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, stored.id);
    assert_eq!(found[0].fields, body);
}

#[tokio::test]
async fn membership_matches_whole_array_elements() {
    let Some(store) = connect().await else { return };
    let vip = format!("vip-{}", Uuid::new_v4());
    let other = format!("{vip}x");

    for (i, tags) in [json!([vip]), json!([]), json!(["cold", vip]), json!([other])]
        .into_iter()
        .enumerate()
    {
        let lead = document(json!({"notes": i.to_string(), "tags": tags}));
        store.insert(Collection::Lead, lead).await.unwrap();
    }

    let tagged = store
        .find(Collection::Lead, Filter::all().contains("tags", Some(&vip)), 50)
        .await
        .unwrap();

    assert_eq!(notes(&tagged), vec!["0", "2"]);
}

#[tokio::test]
async fn equality_clauses_are_exact_and_conjunctive() {
    let Some(store) = connect().await else { return };
    let company = format!("Acme-{}", Uuid::new_v4());
    let lowercase = company.to_lowercase();

    for (company, signal_type) in [
        (company.as_str(), "site-visit"),
        (company.as_str(), "tech-stack"),
        (lowercase.as_str(), "site-visit"),
    ] {
        let signal = document(json!({"company": company, "type": signal_type}));
        store.insert(Collection::IntentSignal, signal).await.unwrap();
    }

    let by_company = store
        .find(Collection::IntentSignal, Filter::all().equals("company", Some(&company)), 50)
        .await
        .unwrap();
    let both = store
        .find(
            Collection::IntentSignal,
            Filter::all().equals("company", Some(&company)).equals("type", Some("site-visit")),
            50,
        )
        .await
        .unwrap();

    assert_eq!(by_company.len(), 2);
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].fields["type"], "site-visit");
}

#[tokio::test]
async fn find_keeps_insertion_order_and_limit() {
    let Some(store) = connect().await else { return };
    let tag = Uuid::new_v4().to_string();

    for i in 0..5 {
        let lead = document(json!({"notes": i.to_string(), "tags": [tag]}));
        store.insert(Collection::Lead, lead).await.unwrap();
    }
    let filter = Filter::all().contains("tags", Some(&tag));

    let all = store.find(Collection::Lead, filter.clone(), 50).await.unwrap();
    let two = store.find(Collection::Lead, filter.clone(), 2).await.unwrap();
    let none = store.find(Collection::Lead, filter, 0).await.unwrap();

    assert_eq!(notes(&all), vec!["0", "1", "2", "3", "4"]);
    assert_eq!(notes(&two), vec!["0", "1"]);
    assert!(none.is_empty());
}

#[tokio::test]
async fn collections_are_separate_tables() {
    let Some(store) = connect().await else { return };
    let marker = Uuid::new_v4().to_string();

    store.insert(Collection::Campaign, document(json!({"name": marker}))).await.unwrap();

    let in_lead = store
        .find(Collection::Lead, Filter::all().equals("name", Some(&marker)), 50)
        .await
        .unwrap();
    let in_campaign = store
        .find(Collection::Campaign, Filter::all().equals("name", Some(&marker)), 50)
        .await
        .unwrap();

    assert!(in_lead.is_empty());
    assert_eq!(in_campaign.len(), 1);
}
