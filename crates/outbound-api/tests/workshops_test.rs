//! Workshop intake form tests.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{violated_fields, TestApp};
use outbound_core::Collection;
use serde_json::json;

#[tokio::test]
async fn launch_does_not_check_campaign_exists() {
    let app = TestApp::new();

    let (status, body) = app.post("/workshops/4-launch", &json!({"campaign_id": "abc123"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["launch"]["campaign_id"], "abc123");
    assert_eq!(app.count(Collection::LaunchInput).await, 1);
    assert_eq!(app.count(Collection::Campaign).await, 0);
}

#[tokio::test]
async fn meeting_request_requires_valid_contact_email() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/workshops/1-meeting",
            &json!({"company": "Acme", "contact_email": "ana@", "business_model": "B2B"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"]["fields"],
        json!([{"field": "contact_email", "reason": "malformed_email"}])
    );
    assert_eq!(app.count(Collection::MeetingRequest).await, 0);
}

#[tokio::test]
async fn meeting_request_is_stored() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/workshops/1-meeting",
            &json!({
                "company": "Acme",
                "contact_email": "ana@acme.io",
                "contact_name": "Ana",
                "business_model": "B2B SaaS",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let meeting = &body["meeting_request"];
    assert_eq!(meeting["contact_name"], "Ana");
    assert_eq!(meeting["goals"], json!(null));
}

#[tokio::test]
async fn persona_workshop_needs_contact_list() {
    let app = TestApp::new();

    let (missing, _) = app.post("/workshops/2-persona", &json!({})).await;
    let (null, body) = app.post("/workshops/2-persona", &json!({"crm_contact_ids": null})).await;
    let (ok, stored) =
        app.post("/workshops/2-persona", &json!({"crm_contact_ids": ["c-2", "c-1"]})).await;

    assert_eq!(missing, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(null, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"][0]["reason"], "wrong_type");
    assert_eq!(ok, StatusCode::OK);
    assert_eq!(stored["persona_workshop"]["crm_contact_ids"], json!(["c-2", "c-1"]));
}

#[tokio::test]
async fn copywriting_validates_every_sequence() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/workshops/3-copywriting",
            &json!({"persona": "CFO", "pains": "manual close", "vocabulary": ["EBITDA", 3]}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(violated_fields(&body), vec!["pains", "vocabulary[1]"]);
}

#[tokio::test]
async fn cold_caller_match_preserves_role_order() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/workshops/3-cold-caller",
            &json!({"industry": "Logistics", "target_roles": ["COO", "VP Ops", "Fleet manager"]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["cold_caller_match"]["target_roles"],
        json!(["COO", "VP Ops", "Fleet manager"])
    );
}

#[tokio::test]
async fn workshops_have_no_listing() {
    let app = TestApp::new();

    let (status, _) = app.get("/workshops/4-launch").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
