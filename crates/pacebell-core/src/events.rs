use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Every state change in the controller produces an Event.
/// The presentation layer subscribes to them; the CLI prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Disclaimer acknowledged with no persisted run to resume.
    WarningAcknowledged {
        at: DateTime<Utc>,
    },
    /// A run began, restarted, or resumed from a persisted timestamp.
    SessionStarted {
        started_at: DateTime<Utc>,
        resumed: bool,
        total_units: i64,
        at: DateTime<Utc>,
    },
    /// A minute boundary was crossed and the cue fired.
    UnitElapsed {
        minute: i64,
        units_remaining: i64,
        at: DateTime<Utc>,
    },
    /// The unit budget is exhausted.
    SessionEnded {
        at: DateTime<Utc>,
    },
    /// Full current state for presentation layers; produced on demand
    /// by `SessionController::snapshot`.
    StateSnapshot {
        state: SessionState,
        elapsed_minutes: i64,
        elapsed_seconds: i64,
        units_remaining: i64,
        seconds_to_next_unit: i64,
        pulse: u64,
        at: DateTime<Utc>,
    },
}
