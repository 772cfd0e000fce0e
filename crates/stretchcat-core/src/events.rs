use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::ReasonCode;
use crate::timer::{PauseReason, Phase, TimerStatus};

/// Every state change in the system produces an Event.
/// The presentation layer renders them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A fresh work phase began (from Idle, after a break, or on skip).
    WorkStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    BreakStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    BreakSkipped {
        skipped_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        reason: PauseReason,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    DurationsUpdated {
        work_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    /// The cached focus mode changed.
    FocusModeChanged {
        mode: Option<String>,
        at: DateTime<Utc>,
    },
    /// The auto-start conditions flipped between satisfied and not.
    ConditionsChanged {
        satisfied: bool,
        reason: ReasonCode,
        at: DateTime<Utc>,
    },
    ScreenLocked {
        at: DateTime<Utc>,
    },
    ScreenUnlocked {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::WorkStarted { .. } => "work_started",
            Event::BreakStarted { .. } => "break_started",
            Event::BreakSkipped { .. } => "break_skipped",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::TimerReset { .. } => "timer_reset",
            Event::DurationsUpdated { .. } => "durations_updated",
            Event::FocusModeChanged { .. } => "focus_mode_changed",
            Event::ConditionsChanged { .. } => "conditions_changed",
            Event::ScreenLocked { .. } => "screen_locked",
            Event::ScreenUnlocked { .. } => "screen_unlocked",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::TimerPaused {
            phase: Phase::Break,
            reason: PauseReason::PolicyBlocked,
            remaining_secs: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["phase"], "break");
        assert_eq!(json["reason"], "policy_blocked");
        assert_eq!(event.kind(), "timer_paused");
    }

    #[test]
    fn event_json_parses_back() {
        let event = Event::FocusModeChanged {
            mode: Some("Work".into()),
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
