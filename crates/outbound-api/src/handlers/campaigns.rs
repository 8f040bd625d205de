//! Campaign intake and listing.

use axum::{extract::State, Json};
use outbound_core::{Campaign, Filter, Record};
use serde_json::Value;
use tracing::instrument;

use super::{insert_record, list_records, ListResponse};
use crate::{
    error::ApiError,
    extract::{ListParams, ValidatedJson},
    AppState,
};

/// Creates a campaign in `draft` status unless one is given.
#[instrument(name = "create_campaign", skip_all, fields(name = %campaign.name))]
pub async fn create_campaign(
    State(state): State<AppState>,
    ValidatedJson(campaign): ValidatedJson<Campaign>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &campaign).await
}

/// Lists campaigns in store order.
#[instrument(name = "list_campaigns", skip_all, fields(limit = query.paging.limit))]
pub async fn list_campaigns(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse>, ApiError> {
    list_records(&state, Campaign::COLLECTION, Filter::all(), query.paging.limit).await
}
