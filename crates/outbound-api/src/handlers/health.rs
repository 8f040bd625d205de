//! Health check handlers for service monitoring.
//!
//! `/test` proves store connectivity with a real write; `/live` only shows
//! the process is serving requests and never touches the store.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use outbound_core::{Clock, Collection, Document, DocumentStore, StoreResult, StoredDocument};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{error::ApiError, AppState};

/// Successful round-trip response.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    /// Always true; failures are reported as errors
    pub ok: bool,
}

/// Health service that writes ping documents with an injected clock.
pub struct HealthService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl HealthService {
    /// Creates a new health service over the given store and clock.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Writes one ping document to the health collection.
    pub async fn ping(&self) -> StoreResult<StoredDocument> {
        let started = self.clock.now();
        let document = ping_document(self.clock.as_ref());

        let stored = self.store.insert(Collection::Health, document).await?;
        debug!(
            id = %stored.id,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Health ping stored"
        );
        Ok(stored)
    }
}

/// `{"status": "ok", "timestamp": <RFC 3339 UTC>}`.
fn ping_document(clock: &dyn Clock) -> Document {
    let mut document = Document::new();
    document.insert("status".into(), Value::String("ok".into()));
    document.insert("timestamp".into(), Value::String(clock.now_utc().to_rfc3339()));
    document
}

/// Store round-trip check.
///
/// A failed write surfaces as a server error with the store's message.
#[instrument(name = "store_roundtrip", skip(app_state))]
pub async fn store_roundtrip(
    State(app_state): State<AppState>,
) -> Result<Json<PingResponse>, ApiError> {
    let service = HealthService::new(app_state.store.clone(), app_state.clock.clone());

    service.ping().await?;
    Ok(Json(PingResponse { ok: true }))
}

/// Liveness check endpoint.
///
/// Returns a simple response indicating the service process is alive.
#[instrument(name = "liveness_check", skip(app_state))]
pub async fn liveness_check(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": app_state.clock.now_utc(),
        "service": "outbound-api"
    });

    (StatusCode::OK, Json(response))
}
