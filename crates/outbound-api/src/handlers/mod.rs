//! HTTP request handlers for the intake API.
//!
//! Every create handler validates its body through [`ValidatedJson`], so a
//! rejected request never reaches the store, then performs exactly one
//! insert. Every list handler performs exactly one find.
//!
//! [`ValidatedJson`]: crate::extract::ValidatedJson

use axum::Json;
use outbound_core::{Collection, Filter, Record, StoreError, StoredDocument};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::{error::ApiError, AppState};

pub mod campaigns;
pub mod health;
pub mod intent_signals;
pub mod leads;
pub mod workshops;

pub use campaigns::{create_campaign, list_campaigns};
pub use health::{liveness_check, store_roundtrip};
pub use intent_signals::{create_intent_signal, list_intent_signals};
pub use leads::{create_lead, list_leads};
pub use workshops::{
    submit_cold_caller_match, submit_copywriting, submit_launch, submit_meeting_request,
    submit_persona_workshop,
};

/// Body of every list response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Matching documents in store order
    pub items: Vec<StoredDocument>,
}

/// Stores a validated record and echoes it with its new id.
///
/// The body is `{"inserted_id": ..., <response key>: {...}}` where the
/// nested object is the stored document including `id`.
pub(crate) async fn insert_record<T: Record>(
    state: &AppState,
    record: &T,
) -> Result<Json<Value>, ApiError> {
    let document = record.to_document()?;
    let stored = state.store.insert(T::COLLECTION, document).await?;

    info!(collection = %T::COLLECTION, id = %stored.id, "Record created");

    let record = serde_json::to_value(&stored).map_err(StoreError::from)?;
    let mut body = Map::new();
    body.insert("inserted_id".into(), Value::String(stored.id.to_string()));
    body.insert(T::RESPONSE_KEY.into(), record);
    Ok(Json(Value::Object(body)))
}

/// Reads up to `limit` documents of a collection matching `filter`.
pub(crate) async fn list_records(
    state: &AppState,
    collection: Collection,
    filter: Filter,
    limit: u32,
) -> Result<Json<ListResponse>, ApiError> {
    let items = state.store.find(collection, filter, limit).await?;
    info!(collection = %collection, count = items.len(), "Records listed");
    Ok(Json(ListResponse { items }))
}
