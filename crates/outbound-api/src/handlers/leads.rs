//! Lead intake and listing.

use axum::{extract::State, Json};
use outbound_core::{Filter, Lead, Record};
use serde_json::Value;
use tracing::instrument;

use super::{insert_record, list_records, ListResponse};
use crate::{
    error::ApiError,
    extract::{ListParams, ValidatedJson},
    AppState,
};

/// Creates a lead. Omitted `source` becomes `"manual"`, omitted `tags`
/// an empty list.
#[instrument(name = "create_lead", skip_all, fields(company = ?lead.company))]
pub async fn create_lead(
    State(state): State<AppState>,
    ValidatedJson(lead): ValidatedJson<Lead>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &lead).await
}

/// Lists leads, optionally only those tagged with `tag`.
#[instrument(
    name = "list_leads",
    skip_all,
    fields(tag = ?query.filter_value("tag"), limit = query.paging.limit)
)]
pub async fn list_leads(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse>, ApiError> {
    let filter = Filter::all().contains("tags", query.filter_value("tag"));
    list_records(&state, Lead::COLLECTION, filter, query.paging.limit).await
}
