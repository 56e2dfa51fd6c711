//! Pacing clock arithmetic.
//!
//! Pure functions over wall-clock timestamps. The session controller
//! supplies both timestamps on every call; nothing here keeps state.

use chrono::{DateTime, Utc};

/// Fixed unit budget for a run: one unit per elapsed minute.
pub const TOTAL_UNITS: i64 = 60;

/// Whole minutes and leftover seconds elapsed since a start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub minutes: i64,
    /// Always in `0..60`.
    pub seconds: i64,
}

/// Elapsed time between `started_at` and `now`.
///
/// A wall clock that moved backward clamps to zero rather than
/// producing negative values.
pub fn elapsed(now: DateTime<Utc>, started_at: DateTime<Utc>) -> Elapsed {
    let total = now.signed_duration_since(started_at).num_seconds().max(0);
    let seconds = total % 60;
    Elapsed {
        minutes: (total - seconds) / 60,
        seconds,
    }
}

/// Units left in the budget after `minutes` have elapsed.
///
/// Raw subtraction; goes negative past the end boundary, so callers
/// check [`is_ended`] first.
pub fn units_remaining(minutes: i64) -> i64 {
    TOTAL_UNITS - minutes
}

pub fn is_ended(minutes: i64) -> bool {
    minutes >= TOTAL_UNITS
}

/// Seconds until the next minute boundary, in `1..=60`.
pub fn seconds_to_next_unit(seconds: i64) -> i64 {
    60 - seconds
}

/// Render elapsed time as `M:SS`.
pub fn format_elapsed(elapsed: &Elapsed) -> String {
    format!("{}:{:02}", elapsed.minutes, elapsed.seconds)
}
