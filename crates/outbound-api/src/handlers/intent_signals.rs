//! Intent signal intake and listing.

use axum::{extract::State, Json};
use outbound_core::{Filter, IntentSignal, Record};
use serde_json::Value;
use tracing::instrument;

use super::{insert_record, list_records, ListResponse};
use crate::{
    error::ApiError,
    extract::{ListParams, ValidatedJson},
    AppState,
};

/// Records a buying-intent signal against a company.
#[instrument(
    name = "create_intent_signal",
    skip_all,
    fields(company = %signal.company, signal_type = %signal.signal_type)
)]
pub async fn create_intent_signal(
    State(state): State<AppState>,
    ValidatedJson(signal): ValidatedJson<IntentSignal>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &signal).await
}

/// Lists signals, filtered by exact `company` and `type` when given.
#[instrument(
    name = "list_intent_signals",
    skip_all,
    fields(
        company = ?query.filter_value("company"),
        signal_type = ?query.filter_value("type"),
        limit = query.paging.limit
    )
)]
pub async fn list_intent_signals(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse>, ApiError> {
    let filter = Filter::all()
        .equals("company", query.filter_value("company"))
        .equals("type", query.filter_value("type"));
    list_records(&state, IntentSignal::COLLECTION, filter, query.paging.limit).await
}
