//! Per-focus-mode work/break lengths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timer::{TimerDurations, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTimerSettings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

fn default_work_minutes() -> u32 {
    DEFAULT_WORK_MINUTES
}
fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MINUTES
}

impl Default for ModeTimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl ModeTimerSettings {
    pub fn durations(&self) -> TimerDurations {
        TimerDurations::from_minutes(self.work_minutes, self.break_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeTimers {
    #[serde(default)]
    pub use_per_mode_settings: bool,
    #[serde(default)]
    pub modes: BTreeMap<String, ModeTimerSettings>,
}

impl ModeTimers {
    /// Durations to use while `focus` is the active mode.
    ///
    /// Falls back to `global` when per-mode settings are off, no mode is
    /// active, or the active mode has no entry.
    pub fn resolve(&self, focus: Option<&str>, global: TimerDurations) -> TimerDurations {
        if !self.use_per_mode_settings {
            return global;
        }
        focus
            .and_then(|mode| self.modes.get(mode))
            .map(ModeTimerSettings::durations)
            .unwrap_or(global)
    }

    pub fn set(&mut self, mode: &str, work_minutes: u32, break_minutes: u32) {
        self.modes.insert(
            mode.to_string(),
            ModeTimerSettings {
                work_minutes,
                break_minutes,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_uses_global() {
        let mut timers = ModeTimers::default();
        timers.set("Work", 50, 10);
        let global = TimerDurations::from_minutes(30, 2);
        assert_eq!(timers.resolve(Some("Work"), global), global);
    }

    #[test]
    fn enabled_uses_mode_entry() {
        let mut timers = ModeTimers {
            use_per_mode_settings: true,
            ..Default::default()
        };
        timers.set("Work", 50, 10);
        let global = TimerDurations::from_minutes(30, 2);
        assert_eq!(
            timers.resolve(Some("Work"), global),
            TimerDurations::from_minutes(50, 10)
        );
        assert_eq!(timers.resolve(Some("Reading"), global), global);
        assert_eq!(timers.resolve(None, global), global);
    }
}
