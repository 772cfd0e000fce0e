//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and break lengths
//! - Auto-start mode, daily time window and selected focus modes
//! - Focus-mode catalog additions and where to read the live focus state
//! - Optional per-focus-mode work/break lengths
//!
//! Configuration is stored at `~/.config/stretchcat/config.toml`. The core
//! never reads this file itself; callers turn it into a [`ControlConfig`]
//! snapshot and hand that over on every change.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::controller::ControlConfig;
use crate::error::ConfigError;
use crate::focus::{default_db_dir, DEFAULT_POLL_INTERVAL};
use crate::policy::{AutoStartMode, AutoStartPolicy, ModeTimers, TimeOfDay, TimeWindow};
use crate::timer::{TimerDurations, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};

/// Work/break lengths in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

/// Auto-start configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoStartConfig {
    #[serde(default)]
    pub mode: AutoStartMode,
    #[serde(default = "default_start_time")]
    pub start_time: TimeOfDay,
    #[serde(default = "default_end_time")]
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub selected_focus_modes: BTreeSet<String>,
}

/// Focus-mode catalog and signal source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Extra mode names offered next to the system ones.
    #[serde(default)]
    pub user_defined_modes: Vec<String>,
    /// Mode reported when no focus assertion is active. Empty means none.
    #[serde(default)]
    pub manual_mode: String,
    /// Empty means the platform default location.
    #[serde(default)]
    pub assertions_path: String,
    /// Empty means the platform default location.
    #[serde(default)]
    pub mode_configurations_path: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Identifier → name entries checked before the system configurations.
    #[serde(default)]
    pub identifier_map: BTreeMap<String, String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/stretchcat/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub auto_start: AutoStartConfig,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub mode_timers: ModeTimers,
}

// Default functions
fn default_work_minutes() -> u32 {
    DEFAULT_WORK_MINUTES
}
fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MINUTES
}
fn default_start_time() -> TimeOfDay {
    TimeWindow::default().start
}
fn default_end_time() -> TimeOfDay {
    TimeWindow::default().end
}
fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for AutoStartConfig {
    fn default() -> Self {
        Self {
            mode: AutoStartMode::Manual,
            start_time: default_start_time(),
            end_time: default_end_time(),
            selected_focus_modes: BTreeSet::new(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            user_defined_modes: Vec::new(),
            manual_mode: String::new(),
            assertions_path: String::new(),
            mode_configurations_path: String::new(),
            poll_interval_secs: default_poll_interval_secs(),
            identifier_map: BTreeMap::new(),
        }
    }
}

impl TimerConfig {
    /// Zero minutes falls back to the default length.
    pub fn durations(&self) -> TimerDurations {
        let work = if self.work_minutes == 0 {
            DEFAULT_WORK_MINUTES
        } else {
            self.work_minutes
        };
        let brk = if self.break_minutes == 0 {
            DEFAULT_BREAK_MINUTES
        } else {
            self.break_minutes
        };
        TimerDurations::from_minutes(work, brk)
    }
}

impl AutoStartConfig {
    pub fn policy(&self) -> AutoStartPolicy {
        AutoStartPolicy {
            mode: self.mode,
            window: TimeWindow::new(self.start_time, self.end_time),
            focus_modes: self.selected_focus_modes.clone(),
        }
    }
}

impl FocusConfig {
    pub fn manual_mode(&self) -> Option<String> {
        let mode = self.manual_mode.trim();
        (!mode.is_empty()).then(|| mode.to_string())
    }

    pub fn assertions_path(&self) -> Option<PathBuf> {
        configured_or_default(&self.assertions_path, "Assertions.json")
    }

    pub fn mode_configurations_path(&self) -> Option<PathBuf> {
        configured_or_default(&self.mode_configurations_path, "ModeConfigurations.json")
    }

    /// Add a user-defined mode. Returns false for empty or duplicate names.
    pub fn add_user_mode(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.user_defined_modes.iter().any(|m| m == name) {
            return false;
        }
        self.user_defined_modes.push(name.to_string());
        true
    }

    /// Remove a user-defined mode. Returns false if it was not present.
    pub fn remove_user_mode(&mut self, name: &str) -> bool {
        let before = self.user_defined_modes.len();
        self.user_defined_modes.retain(|m| m != name);
        self.user_defined_modes.len() != before
    }
}

fn configured_or_default(configured: &str, file_name: &str) -> Option<PathBuf> {
    if configured.trim().is_empty() {
        default_db_dir().map(|dir| dir.join(file_name))
    } else {
        Some(PathBuf::from(configured.trim()))
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
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Array(_) if !value.trim_start().starts_with('[') => {
                        serde_json::Value::Array(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(|s| serde_json::Value::String(s.to_string()))
                                .collect(),
                        )
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

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a value by dot-separated key, validating the whole config.
    /// Does not persist; call [`Config::save`] afterwards.
    ///
    /// Lists accept either JSON (`["Work","Reading"]`) or a comma-separated
    /// string (`Work,Reading`).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Snapshot handed to the schedule controller.
    pub fn control_config(&self) -> ControlConfig {
        ControlConfig {
            policy: self.auto_start.policy(),
            durations: self.timer.durations(),
            mode_timers: self.mode_timers.clone(),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
