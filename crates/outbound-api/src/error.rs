//! Structured error responses.
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}`;
//! validation failures additionally list each rejected field. Client
//! errors are logged at `warn`, store failures at `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use outbound_core::{FieldViolation, OutboundError, StoreError, ValidationError};
use serde::Serialize;
use tracing::{error, warn};

/// Error response with code and message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details including code and message
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code from the taxonomy (E1001-E3002)
    pub code: String,
    /// Human-readable error description
    pub message: String,
    /// Rejected fields, for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldViolation>>,
}

/// Handler error carrying an [`OutboundError`] to the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub OutboundError);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            OutboundError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            OutboundError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            OutboundError::StoreUnavailable(_) | OutboundError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl From<OutboundError> for ApiError {
    fn from(err: OutboundError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(OutboundError::Validation(err))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(OutboundError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.0.is_client_error() {
            warn!(code = self.0.code(), error = %self.0, "Request rejected");
        } else {
            error!(code = self.0.code(), error = %self.0, "Store operation failed");
        }

        let fields = match &self.0 {
            OutboundError::Validation(err) => Some(err.violations().to_vec()),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.0.code().to_string(),
                message: self.0.to_string(),
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}
