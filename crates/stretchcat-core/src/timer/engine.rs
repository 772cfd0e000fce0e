//! Interval timer state machine.
//!
//! The timer does not own a clock thread. The caller delivers one `tick()`
//! per elapsed second while a phase is running; the control runtime does
//! this from a single task so ticks never race with pause/reset.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Working -> Breaking -> Working -> ...   (cyclic, no terminal state)
//!            \          /
//!             -> Paused -
//! ```
//!
//! Every command that is not valid in the current state is a silent no-op
//! and returns `None`, so stale button presses are harmless.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::durations::{Phase, TimerDurations};
use crate::events::Event;

/// Why a paused timer was paused. Auto-resume only undoes its own reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    PolicyBlocked,
    ScreenLocked,
    UserRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Working,
    Breaking,
    /// Clock stopped. `resume_to` is the phase that was active.
    Paused {
        resume_to: Phase,
        reason: PauseReason,
    },
}

impl TimerState {
    /// True while the one-second clock is running.
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Working | TimerState::Breaking)
    }

    /// The running or paused phase, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            TimerState::Idle => None,
            TimerState::Working => Some(Phase::Work),
            TimerState::Breaking => Some(Phase::Break),
            TimerState::Paused { resume_to, .. } => Some(*resume_to),
        }
    }

    pub fn pause_reason(&self) -> Option<PauseReason> {
        match self {
            TimerState::Paused { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Serializable view of the timer for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerStatus {
    #[serde(flatten)]
    pub state: TimerState,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress: f64,
    pub display: String,
    pub durations: TimerDurations,
}

/// Invoked synchronously, once per break start.
pub type BreakCallback = Box<dyn FnMut() + Send>;

pub struct IntervalTimer {
    durations: TimerDurations,
    state: TimerState,
    remaining_secs: u64,
    total_secs: u64,
    on_break_start: Option<BreakCallback>,
}

impl fmt::Debug for IntervalTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalTimer")
            .field("durations", &self.durations)
            .field("state", &self.state)
            .field("remaining_secs", &self.remaining_secs)
            .field("total_secs", &self.total_secs)
            .field("on_break_start", &self.on_break_start.is_some())
            .finish()
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(TimerDurations::default())
    }
}

impl IntervalTimer {
    /// Create an idle timer with the full work duration loaded.
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            durations,
            state: TimerState::Idle,
            remaining_secs: durations.work_secs,
            total_secs: durations.work_secs,
            on_break_start: None,
        }
    }

    pub fn set_on_break_start(&mut self, callback: BreakCallback) {
        self.on_break_start = Some(callback);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
    }

    /// Remaining time as `MM:SS`. Minutes are not wrapped at 60.
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    pub fn status(&self) -> TimerStatus {
        TimerStatus {
            state: self.state,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress: self.progress(),
            display: self.format_remaining(),
            durations: self.durations,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle → Working with a fresh work phase; Paused → resume in place.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => Some(self.begin_work()),
            TimerState::Paused { resume_to, .. } => {
                self.state = match resume_to {
                    Phase::Work => TimerState::Working,
                    Phase::Break => TimerState::Breaking,
                };
                Some(Event::TimerResumed {
                    phase: resume_to,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Working | TimerState::Breaking => None,
        }
    }

    /// Stop the clock, keeping the remaining time.
    ///
    /// Pausing an already paused timer leaves it untouched, except that a
    /// user request takes over the reason so nothing auto-resumes it.
    pub fn pause(&mut self, reason: PauseReason) -> Option<Event> {
        match self.state {
            TimerState::Working | TimerState::Breaking => {
                let phase = self.state.phase()?;
                self.state = TimerState::Paused {
                    resume_to: phase,
                    reason,
                };
                Some(Event::TimerPaused {
                    phase,
                    reason,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused {
                resume_to,
                reason: current,
            } if reason == PauseReason::UserRequested && current != reason => {
                self.state = TimerState::Paused { resume_to, reason };
                Some(Event::TimerPaused {
                    phase: resume_to,
                    reason,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Back to Idle with a full work phase loaded. Valid from any state.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.remaining_secs = self.durations.work_secs;
        self.total_secs = self.durations.work_secs;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Force a break from any state and notify the break listener.
    pub fn start_break(&mut self) -> Option<Event> {
        self.state = TimerState::Breaking;
        self.remaining_secs = self.durations.break_secs;
        self.total_secs = self.durations.break_secs;
        if let Some(callback) = self.on_break_start.as_mut() {
            callback();
        }
        Some(Event::BreakStarted {
            duration_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// End a running break early and go straight into a new work phase.
    pub fn skip_break(&mut self) -> Option<Event> {
        if self.state != TimerState::Breaking {
            return None;
        }
        let skipped_secs = self.remaining_secs;
        self.begin_work();
        Some(Event::BreakSkipped {
            skipped_secs,
            at: Utc::now(),
        })
    }

    /// Replace the configured durations.
    ///
    /// An idle timer reloads the new work length right away; a running or
    /// paused phase keeps its length until the next phase boundary.
    pub fn update_durations(&mut self, durations: TimerDurations) -> Option<Event> {
        if durations == self.durations {
            return None;
        }
        self.durations = durations;
        if self.state == TimerState::Idle {
            self.remaining_secs = durations.work_secs;
            self.total_secs = durations.work_secs;
        }
        Some(Event::DurationsUpdated {
            work_secs: durations.work_secs,
            break_secs: durations.break_secs,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns the phase-change event when a phase ends.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        match self.state {
            TimerState::Working => self.start_break(),
            TimerState::Breaking => Some(self.begin_work()),
            _ => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_work(&mut self) -> Event {
        self.state = TimerState::Working;
        self.remaining_secs = self.durations.work_secs;
        self.total_secs = self.durations.work_secs;
        Event::WorkStarted {
            duration_secs: self.total_secs,
            at: Utc::now(),
        }
    }
}
