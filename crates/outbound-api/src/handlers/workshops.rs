//! Workshop intake forms.
//!
//! Each step of the outbound methodology posts one form. Forms are
//! write-only: there is no listing endpoint, and `LaunchInput.campaign_id`
//! is stored as given without checking that the campaign exists.

use axum::{extract::State, Json};
use outbound_core::{
    ColdCallerMatchInput, CopywritingInput, LaunchInput, MeetingRequest, PersonaWorkshopInput,
};
use serde_json::Value;
use tracing::instrument;

use super::insert_record;
use crate::{error::ApiError, extract::ValidatedJson, AppState};

/// Step 1: meeting request from a prospective client.
#[instrument(name = "submit_meeting_request", skip_all, fields(company = %input.company))]
pub async fn submit_meeting_request(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<MeetingRequest>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &input).await
}

/// Step 2: persona workshop over existing CRM contacts.
#[instrument(
    name = "submit_persona_workshop",
    skip_all,
    fields(contacts = input.crm_contact_ids.len())
)]
pub async fn submit_persona_workshop(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<PersonaWorkshopInput>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &input).await
}

/// Step 3a: copywriting brief.
#[instrument(name = "submit_copywriting", skip_all, fields(persona = %input.persona))]
pub async fn submit_copywriting(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CopywritingInput>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &input).await
}

/// Step 3b: cold caller matching.
#[instrument(name = "submit_cold_caller_match", skip_all, fields(industry = %input.industry))]
pub async fn submit_cold_caller_match(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ColdCallerMatchInput>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &input).await
}

/// Step 4: campaign launch.
#[instrument(name = "submit_launch", skip_all, fields(campaign_id = %input.campaign_id))]
pub async fn submit_launch(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LaunchInput>,
) -> Result<Json<Value>, ApiError> {
    insert_record(&state, &input).await
}
