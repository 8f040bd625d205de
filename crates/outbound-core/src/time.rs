//! Clock abstraction for timestamps written into stored documents.
//!
//! Production code uses `RealClock`; tests inject a `TestClock` so health
//! ping documents carry predictable timestamps.

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, TimeZone, Utc};

/// Source of wall-clock and monotonic time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current instant for duration measurements.
    fn now(&self) -> Instant;

    /// Returns the current UTC wall-clock time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Clock backed by the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Wall-clock time only moves through [`TestClock::advance`]; clones share
/// the same time.
#[derive(Debug, Clone)]
pub struct TestClock {
    /// Wall-clock time as milliseconds since the UNIX epoch
    utc_ms: Arc<AtomicI64>,
    /// Base instant for monotonic time calculations
    base_instant: Instant,
}

impl TestClock {
    /// Creates a clock frozen at the given time.
    pub fn with_start_time(start: DateTime<Utc>) -> Self {
        Self {
            utc_ms: Arc::new(AtomicI64::new(start.timestamp_millis())),
            base_instant: Instant::now(),
        }
    }

    /// Moves wall-clock time forward.
    pub fn advance(&self, duration: Duration) {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self.utc_ms.fetch_add(millis, Ordering::AcqRel);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::with_start_time(Utc::now())
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base_instant
    }

    fn now_utc(&self) -> DateTime<Utc> {
        let millis = self.utc_ms.load(Ordering::Acquire);
        Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
    }
}
