//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default breathing pacer phase lengths
//! - The worry window seeded on first run and the gate poll interval
//! - Log level for the CLI subscriber
//!
//! Configuration is stored at `<data_dir>/config.toml`. Journal data itself
//! never lives here; it belongs to the key-value namespace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::breath::BreathDurations;
use crate::error::ConfigError;
use crate::worry::WorryWindowConfig;

/// Breathing pacer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathConfig {
    #[serde(default = "default_inhale")]
    pub inhale_secs: u32,
    #[serde(default = "default_hold")]
    pub hold_secs: u32,
    #[serde(default = "default_exhale")]
    pub exhale_secs: u32,
}

/// Worry window defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorryWindowDefaults {
    /// `HH:MM`, used when no window has been saved yet.
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    /// How often the gate is re-evaluated while watching.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub breath: BreathConfig,
    #[serde(default)]
    pub worry_window: WorryWindowDefaults,
}

fn default_inhale() -> u32 {
    4
}
fn default_hold() -> u32 {
    4
}
fn default_exhale() -> u32 {
    6
}
fn default_start_time() -> String {
    "19:00".into()
}
fn default_duration_minutes() -> u32 {
    15
}
fn default_poll_interval_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for BreathConfig {
    fn default() -> Self {
        Self {
            inhale_secs: default_inhale(),
            hold_secs: default_hold(),
            exhale_secs: default_exhale(),
        }
    }
}

impl Default for WorryWindowDefaults {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            duration_minutes: default_duration_minutes(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            breath: BreathConfig::default(),
            worry_window: WorryWindowDefaults::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config location inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there when missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Pacer phase lengths, clamped to their minimums.
    pub fn breath_durations(&self) -> BreathDurations {
        BreathDurations::new(
            i64::from(self.breath.inhale_secs),
            i64::from(self.breath.hold_secs),
            i64::from(self.breath.exhale_secs),
        )
    }

    /// Window used before the user has saved one.
    pub fn default_window(&self) -> WorryWindowConfig {
        let start = WorryWindowConfig::parse_start(&self.worry_window.start_time)
            .unwrap_or_else(|| WorryWindowConfig::default().start_time);
        WorryWindowConfig::new(start, i64::from(self.worry_window.duration_minutes))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.worry_window.poll_interval_secs.max(1))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
