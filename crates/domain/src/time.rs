//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for plan creation times and state-change records.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Milliseconds elapsed between `since` and `now`, saturating at zero.
#[must_use]
pub fn elapsed_ms(since: Timestamp, now: Timestamp) -> u64 {
    u64::try_from((now - since).num_milliseconds()).unwrap_or(0)
}
