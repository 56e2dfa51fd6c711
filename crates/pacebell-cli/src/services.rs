//! Console implementations of the platform collaborators.
//!
//! There is no notification daemon or audio backend here: the notifier
//! reports through the log, and the cue is the terminal bell.

use std::io::Write;

use pacebell_core::error::Result;
use pacebell_core::services::{CuePlayer, Notifier, PermissionCallback};
use pacebell_core::storage::Config;

/// Notifier that logs instead of delivering.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn request_permission(&self, on_result: PermissionCallback) {
        // The console can always "notify"; answer inline.
        on_result(true);
    }

    fn schedule_notification(&self, body: &str, badge: i64, delay_secs: u64) -> Result<()> {
        tracing::info!("notification in {delay_secs}s: {body} (badge {badge})");
        Ok(())
    }

    fn set_badge(&self, count: i64) -> Result<()> {
        tracing::debug!("badge set to {count}");
        Ok(())
    }
}

/// Cue player that rings the terminal bell.
pub struct TerminalCue {
    enabled: bool,
}

impl TerminalCue {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.notifications.enabled,
        }
    }
}

impl CuePlayer for TerminalCue {
    fn play_cue(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}
