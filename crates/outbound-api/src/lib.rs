//! Outbound intake HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use outbound_core::{Clock, DocumentStore, RealClock};

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use error::ApiError;
pub use server::{create_router, create_router_with_timeout, start_server};

/// Shared handles cloned into every request.
///
/// The store is initialized once at process start and lives until the
/// server stops; requests never hold any other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Document store every operation reads from or writes to
    pub store: Arc<dyn DocumentStore>,
    /// Time source for timestamps written by the service
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates state over a store using the system clock.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, clock: Arc::new(RealClock::new()) }
    }

    /// Replaces the clock, typically with a `TestClock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
