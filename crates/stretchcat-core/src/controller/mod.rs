//! Schedule controller: the control loop tying policy, focus signal and
//! timer together.
//!
//! Triggers arrive one at a time as [`ControlEvent`]s. Each trigger is
//! handled to completion against an explicit [`ControlConfig`] snapshot and
//! the current time of day; nothing is cached from earlier snapshots.
//!
//! Pauses are tagged with a [`PauseReason`]. The policy only resumes what it
//! paused itself, a screen unlock only resumes what the lock paused, and a
//! pause requested by the user is never undone automatically.

mod runtime;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::focus::FocusSignal;
use crate::policy::{AutoStartMode, AutoStartPolicy, ModeTimers, TimeOfDay};
use crate::timer::{BreakCallback, IntervalTimer, PauseReason, TimerDurations, TimerState};

pub use runtime::{ControlHandle, ControlLoop, POLICY_INTERVAL};

/// Everything the controller reads from configuration, as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlConfig {
    pub policy: AutoStartPolicy,
    pub durations: TimerDurations,
    #[serde(default)]
    pub mode_timers: ModeTimers,
}

impl ControlConfig {
    /// Durations for the given focus mode, honoring per-mode settings.
    pub fn effective_durations(&self, focus: Option<&str>) -> TimerDurations {
        self.mode_timers.resolve(focus, self.durations)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Coarse periodic re-evaluation, catches time-window boundaries.
    PolicyTick,
    /// One second of the interval clock elapsed.
    SecondElapsed,
    FocusChanged(FocusSignal),
    ScreenLocked,
    ScreenUnlocked,
    /// New configuration snapshot. The runtime swaps it in before handling.
    ConfigChanged(Box<ControlConfig>),
    Start,
    Pause,
    Reset,
    StartBreak,
    SkipBreak,
    /// Emit a state snapshot.
    Snapshot,
    /// Stop the control loop.
    Shutdown,
}

#[derive(Debug)]
pub struct ScheduleController {
    timer: IntervalTimer,
    focus: FocusSignal,
    screen_locked: bool,
    resume_after_unlock: bool,
    last_satisfied: Option<bool>,
}

impl ScheduleController {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            timer: IntervalTimer::new(config.effective_durations(None)),
            focus: FocusSignal::inactive(),
            screen_locked: false,
            resume_after_unlock: false,
            last_satisfied: None,
        }
    }

    pub fn set_on_break_start(&mut self, callback: BreakCallback) {
        self.timer.set_on_break_start(callback);
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn focus(&self) -> &FocusSignal {
        &self.focus
    }

    pub fn is_screen_locked(&self) -> bool {
        self.screen_locked
    }

    /// True while a lock-induced pause is waiting for the unlock.
    pub fn resume_pending(&self) -> bool {
        self.resume_after_unlock
    }

    /// Handle one trigger and return every event it produced, in order.
    pub fn handle(
        &mut self,
        event: ControlEvent,
        config: &ControlConfig,
        now: TimeOfDay,
    ) -> Vec<Event> {
        let mut out = Vec::new();
        match event {
            ControlEvent::SecondElapsed => {
                out.extend(self.timer.tick());
                return out;
            }
            ControlEvent::PolicyTick => {}
            ControlEvent::FocusChanged(signal) => {
                if signal.current_mode != self.focus.current_mode {
                    tracing::info!(mode = ?signal.current_mode, "focus mode changed");
                    out.push(Event::FocusModeChanged {
                        mode: signal.current_mode.clone(),
                        at: Utc::now(),
                    });
                }
                self.focus = signal;
                out.extend(self.sync_durations(config));
            }
            ControlEvent::ConfigChanged(_) => {
                out.extend(self.sync_durations(config));
            }
            ControlEvent::ScreenLocked => {
                out.extend(self.lock());
                return out;
            }
            ControlEvent::ScreenUnlocked => {
                out.extend(self.unlock());
            }
            ControlEvent::Start => {
                out.extend(self.timer.start());
                return out;
            }
            ControlEvent::Pause => {
                out.extend(self.timer.pause(PauseReason::UserRequested));
                return out;
            }
            ControlEvent::Reset => {
                out.extend(self.timer.reset());
                return out;
            }
            ControlEvent::StartBreak => {
                out.extend(self.timer.start_break());
                return out;
            }
            ControlEvent::SkipBreak => {
                out.extend(self.timer.skip_break());
                return out;
            }
            ControlEvent::Snapshot => {
                out.push(self.timer.snapshot());
                return out;
            }
            ControlEvent::Shutdown => return out,
        }
        out.extend(self.evaluate(config, now));
        out
    }

    /// Re-evaluate the auto-start policy and drive the timer accordingly.
    /// Suspended while the screen is locked.
    pub fn evaluate(&mut self, config: &ControlConfig, now: TimeOfDay) -> Vec<Event> {
        let mut out = Vec::new();
        if self.screen_locked {
            return out;
        }
        let focus = self.focus.current_mode.as_deref();
        let evaluation = config.policy.evaluate(now, focus);

        if self.last_satisfied != Some(evaluation.satisfied) {
            tracing::debug!(satisfied = evaluation.satisfied, reason = %evaluation.message, "auto-start conditions changed");
            self.last_satisfied = Some(evaluation.satisfied);
            out.push(Event::ConditionsChanged {
                satisfied: evaluation.satisfied,
                reason: evaluation.reason,
                at: Utc::now(),
            });
        }

        match self.timer.state() {
            state if state.is_running() => {
                if !evaluation.satisfied {
                    tracing::info!(reason = %evaluation.message, "pausing timer, conditions no longer hold");
                    out.extend(self.timer.pause(PauseReason::PolicyBlocked));
                }
            }
            TimerState::Paused {
                reason: PauseReason::PolicyBlocked,
                ..
            } => {
                if config.policy.mode != AutoStartMode::Manual && evaluation.satisfied {
                    tracing::info!(reason = %evaluation.message, "resuming timer");
                    out.extend(self.timer.start());
                }
            }
            TimerState::Idle => {
                if config.policy.should_auto_start(now, focus) {
                    tracing::info!(reason = %evaluation.message, "auto-starting timer");
                    out.extend(self.timer.start());
                }
            }
            _ => {}
        }
        out
    }

    fn sync_durations(&mut self, config: &ControlConfig) -> Option<Event> {
        let durations = config.effective_durations(self.focus.current_mode.as_deref());
        self.timer.update_durations(durations)
    }

    fn lock(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        if self.screen_locked {
            return out;
        }
        self.screen_locked = true;
        out.push(Event::ScreenLocked { at: Utc::now() });
        if self.timer.state().is_running() {
            self.resume_after_unlock = true;
            out.extend(self.timer.pause(PauseReason::ScreenLocked));
        }
        out
    }

    fn unlock(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        if !self.screen_locked {
            return out;
        }
        self.screen_locked = false;
        out.push(Event::ScreenUnlocked { at: Utc::now() });
        let resume = std::mem::take(&mut self.resume_after_unlock);
        if resume && self.timer.state().pause_reason() == Some(PauseReason::ScreenLocked) {
            out.extend(self.timer.start());
        }
        out
    }
}
