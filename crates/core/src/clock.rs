//! Time source abstraction.
//!
//! Components that stamp records take a `&dyn Clock` (or an `Arc<dyn Clock>`)
//! instead of calling `Utc::now()` directly, so tests can pin the instant.

use chrono::{DateTime, TimeZone, Utc};

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Create a clock that always returns `instant`.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Default for FixedClock {
    /// Mon Jan 2 15:04:05 MST 2006, i.e. 22:04:05 UTC.
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
