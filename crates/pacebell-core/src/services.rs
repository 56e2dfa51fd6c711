//! Narrow interfaces to the platform collaborators.
//!
//! The controller treats all three services as best-effort: a failure
//! is logged and otherwise ignored, never propagated into the state
//! machine. A skipped cue beats a stalled timer.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Durable store for the single start timestamp.
///
/// An absent value means no active run. The timestamp is set on start
/// and cleared when the budget runs out, so a relaunch mid-run resumes
/// where it left off.
pub trait StartTimeStore {
    fn start_time(&self) -> Result<Option<DateTime<Utc>>>;
    fn set_start_time(&self, started_at: DateTime<Utc>) -> Result<()>;
    fn clear_start_time(&self) -> Result<()>;
}

/// Callback invoked with the outcome of a permission request.
pub type PermissionCallback = Box<dyn FnOnce(bool) + Send>;

/// Platform notification delivery.
pub trait Notifier {
    /// Ask the platform for notification permission. Fire-and-forget:
    /// the outcome is delivered to `on_result` and only ever logged,
    /// never awaited by the state machine.
    fn request_permission(&self, on_result: PermissionCallback);

    /// Schedule a local notification to fire after `delay_secs`.
    fn schedule_notification(&self, body: &str, badge: i64, delay_secs: u64) -> Result<()>;

    /// Replace the application badge count.
    fn set_badge(&self, count: i64) -> Result<()>;
}

/// Playback of the fixed cue sound at fixed volume.
pub trait CuePlayer {
    fn play_cue(&self) -> Result<()>;
}
