//! Error types for intake and listing operations.
//!
//! Defines the structured error taxonomy with codes for client
//! disambiguation and HTTP status mapping. Covers request validation and
//! document store failures; no other failure modes exist at this layer.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias using `OutboundError`.
pub type Result<T> = std::result::Result<T, OutboundError>;

/// Failure talking to or writing through the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (pool closed, connect or acquire
    /// failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the operation.
    #[error("store error: {0}")]
    Database(String),

    /// A document could not be converted to or from its stored form.
    #[error("document serialization failed: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Outbound error types with stable codes.
#[derive(Debug, Error)]
pub enum OutboundError {
    // Client errors (E1001-E1002)
    /// Request body or query parameters failed schema validation (E1001).
    #[error("[E1001] Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be read as JSON (E1002).
    #[error("[E1002] Malformed body: {0}")]
    MalformedBody(String),

    // System errors (E3001-E3002)
    /// Document store could not be reached (E3001).
    #[error("[E3001] Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Document store operation failed (E3002).
    #[error("[E3002] Store failure: {0}")]
    Store(String),
}

impl From<StoreError> for OutboundError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => Self::StoreUnavailable(message),
            StoreError::Database(message) | StoreError::Serialization(message) => {
                Self::Store(message)
            },
        }
    }
}

impl OutboundError {
    /// Returns the error code (E1001-E3002).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E1001",
            Self::MalformedBody(_) => "E1002",
            Self::StoreUnavailable(_) => "E3001",
            Self::Store(_) => "E3002",
        }
    }

    /// Returns whether the caller is at fault.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MalformedBody(_))
    }
}
