//! TOML-based application configuration.
//!
//! Stores cue and notification preferences at
//! `~/.config/pacebell/config.toml`. The unit budget itself is fixed
//! and deliberately not configurable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, Result};

fn default_true() -> bool {
    true
}

fn default_volume() -> u32 {
    50
}

/// Cue and notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cue volume in percent. The cue always plays at this one level.
    #[serde(default = "default_volume")]
    pub volume: u32,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file is
    /// missing.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Read a value by dotted key, e.g. `notifications.volume`.
    pub fn get_key(&self, key: &str) -> Result<String> {
        match key {
            "notifications.enabled" => Ok(self.notifications.enabled.to_string()),
            "notifications.volume" => Ok(self.notifications.volume.to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
    }

    /// Set a value by dotted key.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "notifications.enabled" => {
                self.notifications.enabled =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("expected true or false, got {value:?}"),
                    })?;
            }
            "notifications.volume" => {
                let volume: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected an integer, got {value:?}"),
                })?;
                if volume > 100 {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("volume must be 0-100, got {volume}"),
                    }
                    .into());
                }
                self.notifications.volume = volume;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        Ok(())
    }

    /// All keys with current values, for `config list`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "notifications.enabled",
                self.notifications.enabled.to_string(),
            ),
            (
                "notifications.volume",
                self.notifications.volume.to_string(),
            ),
        ]
    }
}
