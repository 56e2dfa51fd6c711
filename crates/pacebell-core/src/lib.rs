//! # Pacebell Core Library
//!
//! Core logic for Pacebell, a single-session pacing timer: one sensory
//! cue per elapsed minute against a fixed budget of 60 units.
//!
//! ## Architecture
//!
//! - **Pacing clock**: pure arithmetic turning a start timestamp and the
//!   current time into elapsed minutes/seconds and units remaining
//! - **Session controller**: a wall-clock-based state machine that
//!   requires the caller to periodically invoke `tick()` for progress
//! - **Services**: narrow traits for the platform collaborators
//!   (durable start-time store, notifications, audio cue)
//! - **Storage**: SQLite-backed start-time persistence and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`SessionController`]: lifecycle state machine
//! - [`clock`]: pacing arithmetic
//! - [`Database`]: start-timestamp persistence
//! - [`Config`]: application configuration

pub mod clock;
pub mod error;
pub mod events;
pub mod services;
pub mod session;
pub mod storage;

pub use clock::{Elapsed, TOTAL_UNITS};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use services::{CuePlayer, Notifier, StartTimeStore};
pub use session::{SessionController, SessionState};
pub use storage::{Config, Database};
