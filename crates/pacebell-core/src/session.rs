//! Session lifecycle state machine.
//!
//! The controller is wall-clock-based and caller-ticked. It does not
//! use internal threads - an external driver calls `tick()` about once
//! per second, and the controller decides when a minute boundary was
//! crossed and fires the cue side effects.
//!
//! ## State Transitions
//!
//! ```text
//! ShowWarning -> BeforeStart -> Started -> Ended -> Started -> ...
//!           \___________________^
//!            (persisted run resumes directly on acknowledgment)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = SessionController::new(store, notifier, cue);
//! session.acknowledge_warning(Utc::now());
//! session.start(Utc::now());
//! // In a loop, about once per second:
//! session.tick(Utc::now()); // Returns Some(Event) on a minute boundary
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::events::Event;
use crate::services::{CuePlayer, Notifier, StartTimeStore};

/// Delay before a scheduled cue notification fires, in seconds.
pub const CUE_NOTIFY_DELAY_SECS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the disclaimer to be acknowledged.
    ShowWarning,
    /// Acknowledged, waiting for an explicit start.
    BeforeStart,
    /// Timer active.
    Started {
        started_at: DateTime<Utc>,
        /// Last elapsed-minute value at which the cue fired; -1 until
        /// the immediate post-start tick.
        last_observed_minute: i64,
    },
    /// Budget exhausted, waiting for a restart.
    Ended,
}

type Subscriber = Box<dyn Fn(&Event) + Send>;

/// Core session controller.
///
/// Single writer: every mutating entry point takes `&mut self`, so
/// commands and ticks are serialized by construction. The caller owns
/// the periodic driver.
pub struct SessionController {
    state: SessionState,
    /// Incremented on every tick in every state; drives UI animation
    /// only and has no bearing on correctness.
    pulse: u64,
    store: Box<dyn StartTimeStore>,
    notifier: Box<dyn Notifier>,
    cue: Box<dyn CuePlayer>,
    subscribers: Vec<Subscriber>,
}

impl SessionController {
    pub fn new(
        store: Box<dyn StartTimeStore>,
        notifier: Box<dyn Notifier>,
        cue: Box<dyn CuePlayer>,
    ) -> Self {
        Self {
            state: SessionState::ShowWarning,
            pulse: 0,
            store,
            notifier,
            cue,
            subscribers: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pulse(&self) -> u64 {
        self.pulse
    }

    /// Build a full state snapshot event for `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        match self.state {
            SessionState::Started { started_at, .. } => {
                let elapsed = clock::elapsed(now, started_at);
                Event::StateSnapshot {
                    state: self.state,
                    elapsed_minutes: elapsed.minutes,
                    elapsed_seconds: elapsed.seconds,
                    units_remaining: clock::units_remaining(elapsed.minutes).max(0),
                    seconds_to_next_unit: clock::seconds_to_next_unit(elapsed.seconds),
                    pulse: self.pulse,
                    at: now,
                }
            }
            _ => Event::StateSnapshot {
                state: self.state,
                elapsed_minutes: 0,
                elapsed_seconds: 0,
                units_remaining: clock::TOTAL_UNITS,
                seconds_to_next_unit: 60,
                pulse: self.pulse,
                at: now,
            },
        }
    }

    /// Register a callback invoked on every emitted event.
    pub fn subscribe(&mut self, subscriber: impl Fn(&Event) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Acknowledge the disclaimer. Valid only from `ShowWarning`;
    /// a no-op otherwise.
    ///
    /// Requests notification permission (outcome only logged), then
    /// either resumes a persisted run or waits for an explicit start.
    pub fn acknowledge_warning(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != SessionState::ShowWarning {
            return None;
        }

        self.notifier.request_permission(Box::new(|granted| {
            if granted {
                tracing::debug!("notification permission granted");
            } else {
                tracing::warn!("notification permission denied; cue notifications will be dropped");
            }
        }));

        let persisted = match self.store.start_time() {
            Ok(ts) => ts,
            Err(e) => {
                tracing::warn!("failed to read persisted start time: {e}");
                None
            }
        };

        let event = match persisted {
            Some(started_at) => {
                self.state = SessionState::Started {
                    started_at,
                    last_observed_minute: -1,
                };
                Event::SessionStarted {
                    started_at,
                    resumed: true,
                    total_units: clock::TOTAL_UNITS,
                    at: now,
                }
            }
            None => {
                self.state = SessionState::BeforeStart;
                Event::WarningAcknowledged { at: now }
            }
        };
        Some(self.emit(event))
    }

    /// Start a run at `now`. Valid from `BeforeStart` or `Ended`;
    /// a no-op otherwise.
    ///
    /// Persists the timestamp and immediately runs one tick so the
    /// first cue fires at t=0 without waiting a full second.
    pub fn start(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        match self.state {
            SessionState::BeforeStart | SessionState::Ended => {}
            _ => return Vec::new(),
        }

        if let Err(e) = self.store.set_start_time(now) {
            tracing::warn!("failed to persist start time: {e}");
        }
        self.state = SessionState::Started {
            started_at: now,
            last_observed_minute: -1,
        };
        let mut events = vec![self.emit(Event::SessionStarted {
            started_at: now,
            resumed: false,
            total_units: clock::TOTAL_UNITS,
            at: now,
        })];
        events.extend(self.tick(now));
        events
    }

    /// Restart after the budget ran out. Valid only from `Ended`.
    pub fn restart(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        match self.state {
            SessionState::Ended => self.start(now),
            _ => Vec::new(),
        }
    }

    /// Process one tick of the periodic driver.
    ///
    /// In `Started`, detects minute-boundary crossings and fires the
    /// cue once per crossing; transitions to `Ended` when the budget
    /// is exhausted. In every other state only the pulse counter moves.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.pulse += 1;

        let (started_at, last_observed_minute) = match self.state {
            SessionState::Started {
                started_at,
                last_observed_minute,
            } => (started_at, last_observed_minute),
            _ => return None,
        };

        let elapsed = clock::elapsed(now, started_at);

        if clock::is_ended(elapsed.minutes) {
            if let Err(e) = self.store.clear_start_time() {
                tracing::warn!("failed to clear persisted start time: {e}");
            }
            self.fire_cue(0);
            if let Err(e) = self.notifier.set_badge(0) {
                tracing::warn!("failed to reset badge: {e}");
            }
            self.state = SessionState::Ended;
            return Some(self.emit(Event::SessionEnded { at: now }));
        }

        if elapsed.minutes != last_observed_minute {
            let remaining = clock::units_remaining(elapsed.minutes).max(0);
            self.fire_cue(remaining);
            if let Err(e) = self.notifier.set_badge(remaining) {
                tracing::warn!("failed to update badge: {e}");
            }
            self.state = SessionState::Started {
                started_at,
                last_observed_minute: elapsed.minutes,
            };
            return Some(self.emit(Event::UnitElapsed {
                minute: elapsed.minutes,
                units_remaining: remaining,
                at: now,
            }));
        }

        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Audio plus scheduled notification. Both fire-and-forget: a
    /// failed cue is a skipped cue, never a stalled state machine.
    fn fire_cue(&self, units_remaining: i64) {
        if let Err(e) = self.cue.play_cue() {
            tracing::warn!("cue playback failed: {e}");
        }
        let body = format!("{units_remaining} remaining");
        if let Err(e) =
            self.notifier
                .schedule_notification(&body, units_remaining, CUE_NOTIFY_DELAY_SECS)
        {
            tracing::warn!("failed to schedule cue notification: {e}");
        }
    }

    fn emit(&self, event: Event) -> Event {
        for subscriber in &self.subscribers {
            subscriber(&event);
        }
        event
    }
}
