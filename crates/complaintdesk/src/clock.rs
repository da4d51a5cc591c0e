//! Timestamp source for complaint dates.

use chrono::{DateTime, SubsecRound, Utc};

/// Supplies the current time.
pub trait Clock: Send + Sync {
    /// The current instant, in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time truncated to milliseconds, the precision complaints are
/// persisted with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
