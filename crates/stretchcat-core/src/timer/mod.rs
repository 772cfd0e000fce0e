mod durations;
mod engine;

pub use durations::{Phase, TimerDurations, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};
pub use engine::{BreakCallback, IntervalTimer, PauseReason, TimerState, TimerStatus};
