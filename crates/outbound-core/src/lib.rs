//! Core records, validation and storage for the outbound intake service.
//!
//! Provides the intake record types with their validation rules, the
//! collection mapping table, the document store seam with PostgreSQL and
//! in-memory implementations, and the error taxonomy shared with the HTTP
//! layer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;
pub mod time;
pub mod validation;

pub use error::{OutboundError, Result, StoreError, StoreResult};
pub use models::{
    Campaign, ColdCallerMatchInput, Collection, CopywritingInput, IntentSignal, LaunchInput, Lead,
    MeetingRequest, PersonaWorkshopInput, Record,
};
pub use storage::{
    Document, DocumentStore, Filter, MemoryDocumentStore, PostgresDocumentStore, StoredDocument,
};
pub use time::{Clock, RealClock, TestClock};
pub use validation::{FieldViolation, ListQuery, ValidationError, ViolationReason};
