//! Auto-start policy evaluation.
//!
//! Two predicates are derived from one evaluation:
//!
//! - [`AutoStartPolicy::should_auto_start`] decides whether an idle timer
//!   starts by itself. Manual mode never does.
//! - [`AutoStartPolicy::is_allowed_to_run`] decides whether a running
//!   timer may keep running. Manual mode never forces a pause.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::time_window::{TimeOfDay, TimeWindow};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoStartMode {
    #[default]
    Manual,
    TimeWindow,
    FocusMode,
    TimeWindowAndFocusMode,
}

impl AutoStartMode {
    pub const ALL: [AutoStartMode; 4] = [
        AutoStartMode::Manual,
        AutoStartMode::TimeWindow,
        AutoStartMode::FocusMode,
        AutoStartMode::TimeWindowAndFocusMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AutoStartMode::Manual => "manual",
            AutoStartMode::TimeWindow => "time_window",
            AutoStartMode::FocusMode => "focus_mode",
            AutoStartMode::TimeWindowAndFocusMode => "time_window_and_focus_mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AutoStartMode::Manual => "Manual start",
            AutoStartMode::TimeWindow => "Time window only",
            AutoStartMode::FocusMode => "Focus mode only",
            AutoStartMode::TimeWindowAndFocusMode => "Time window and focus mode",
        }
    }
}

impl fmt::Display for AutoStartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoStartMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownMode(s.to_string()))
    }
}

/// Why an evaluation came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ManualMode,
    WithinWindow,
    OutsideWindow,
    FocusModeMatched,
    NoFocusMode,
    FocusModeNotSelected,
    AllConditionsMet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mode: AutoStartMode,
    pub satisfied: bool,
    pub reason: ReasonCode,
    /// Human-readable explanation.
    pub message: String,
}

/// Auto-start configuration snapshot.
///
/// Holds no state of its own; callers pass a fresh snapshot on every
/// evaluation so configuration edits are picked up immediately.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutoStartPolicy {
    pub mode: AutoStartMode,
    pub window: TimeWindow,
    pub focus_modes: BTreeSet<String>,
}

impl AutoStartPolicy {
    pub fn evaluate(&self, now: TimeOfDay, focus: Option<&str>) -> Evaluation {
        let (satisfied, reason, message) = match self.mode {
            AutoStartMode::Manual => (true, ReasonCode::ManualMode, "manual mode".to_string()),
            AutoStartMode::TimeWindow => self.check_window(now),
            AutoStartMode::FocusMode => self.check_focus(focus),
            AutoStartMode::TimeWindowAndFocusMode => match focus {
                None => (false, ReasonCode::NoFocusMode, "no focus mode is active".to_string()),
                Some(_) => {
                    let (in_window, window_reason, window_msg) = self.check_window(now);
                    let (matched, focus_reason, focus_msg) = self.check_focus(focus);
                    if !matched {
                        (false, focus_reason, focus_msg)
                    } else if !in_window {
                        (false, window_reason, window_msg)
                    } else {
                        (
                            true,
                            ReasonCode::AllConditionsMet,
                            format!("{window_msg}; {focus_msg}"),
                        )
                    }
                }
            },
        };
        Evaluation {
            mode: self.mode,
            satisfied,
            reason,
            message,
        }
    }

    /// Whether an idle timer should start on its own.
    pub fn should_auto_start(&self, now: TimeOfDay, focus: Option<&str>) -> bool {
        self.mode != AutoStartMode::Manual && self.evaluate(now, focus).satisfied
    }

    /// Whether a running timer may keep running.
    pub fn is_allowed_to_run(&self, now: TimeOfDay, focus: Option<&str>) -> bool {
        self.evaluate(now, focus).satisfied
    }

    fn check_window(&self, now: TimeOfDay) -> (bool, ReasonCode, String) {
        if self.window.contains(now) {
            (
                true,
                ReasonCode::WithinWindow,
                format!("{now} is within {}", self.window),
            )
        } else {
            (
                false,
                ReasonCode::OutsideWindow,
                format!("{now} is outside {}", self.window),
            )
        }
    }

    fn check_focus(&self, focus: Option<&str>) -> (bool, ReasonCode, String) {
        match focus {
            None => (false, ReasonCode::NoFocusMode, "no focus mode is active".to_string()),
            Some(mode) if self.focus_modes.contains(mode) => (
                true,
                ReasonCode::FocusModeMatched,
                format!("focus mode '{mode}' is selected"),
            ),
            Some(mode) => (
                false,
                ReasonCode::FocusModeNotSelected,
                format!("focus mode '{mode}' is not selected"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn policy(mode: AutoStartMode, modes: &[&str]) -> AutoStartPolicy {
        AutoStartPolicy {
            mode,
            window: TimeWindow::default(),
            focus_modes: modes.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn manual_is_allowed_but_never_auto_starts() {
        let p = policy(AutoStartMode::Manual, &[]);
        for now in ["00:00", "12:00", "23:59"] {
            assert!(p.is_allowed_to_run(t(now), None));
            assert!(!p.should_auto_start(t(now), Some("work")));
        }
        assert_eq!(p.evaluate(t("12:00"), None).reason, ReasonCode::ManualMode);
    }

    #[test]
    fn time_window_boundaries() {
        let p = policy(AutoStartMode::TimeWindow, &[]);
        assert!(p.evaluate(t("09:00"), None).satisfied);
        assert!(p.evaluate(t("18:00"), None).satisfied);
        assert!(!p.evaluate(t("08:59"), None).satisfied);
        let late = p.evaluate(t("18:01"), None);
        assert!(!late.satisfied);
        assert_eq!(late.reason, ReasonCode::OutsideWindow);
        assert_eq!(late.message, "18:01 is outside 09:00-18:00");
        assert!(p.should_auto_start(t("10:00"), None));
    }

    #[test]
    fn focus_mode_membership() {
        let p = policy(AutoStartMode::FocusMode, &["work"]);
        assert!(p.evaluate(t("03:00"), Some("work")).satisfied);
        let other = p.evaluate(t("03:00"), Some("sleep"));
        assert!(!other.satisfied);
        assert_eq!(other.reason, ReasonCode::FocusModeNotSelected);
        assert_eq!(p.evaluate(t("03:00"), None).reason, ReasonCode::NoFocusMode);
    }

    #[test]
    fn conjunction_without_focus_is_never_satisfied() {
        let p = policy(AutoStartMode::TimeWindowAndFocusMode, &["work"]);
        for now in ["00:00", "09:00", "12:00", "18:00", "23:59"] {
            let eval = p.evaluate(t(now), None);
            assert!(!eval.satisfied);
            assert_eq!(eval.reason, ReasonCode::NoFocusMode);
        }
    }

    #[test]
    fn conjunction_requires_both() {
        let p = policy(AutoStartMode::TimeWindowAndFocusMode, &["work"]);
        let both = p.evaluate(t("10:00"), Some("work"));
        assert!(both.satisfied);
        assert_eq!(both.reason, ReasonCode::AllConditionsMet);

        let outside = p.evaluate(t("20:00"), Some("work"));
        assert!(!outside.satisfied);
        assert_eq!(outside.reason, ReasonCode::OutsideWindow);

        let wrong_mode = p.evaluate(t("10:00"), Some("sleep"));
        assert!(!wrong_mode.satisfied);
        assert_eq!(wrong_mode.reason, ReasonCode::FocusModeNotSelected);
    }

    #[test]
    fn mode_parses_from_config_names() {
        assert_eq!("time-window".parse::<AutoStartMode>().unwrap(), AutoStartMode::TimeWindow);
        assert_eq!(
            "TIME_WINDOW_AND_FOCUS_MODE".parse::<AutoStartMode>().unwrap(),
            AutoStartMode::TimeWindowAndFocusMode
        );
        assert!("sometimes".parse::<AutoStartMode>().is_err());
        for mode in AutoStartMode::ALL {
            assert_eq!(mode.as_str().parse::<AutoStartMode>().unwrap(), mode);
        }
    }
}
