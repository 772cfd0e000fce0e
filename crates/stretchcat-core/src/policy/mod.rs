//! Auto-start rules: when the timer may start and keep running.

mod auto_start;
mod mode_timers;
mod time_window;

pub use auto_start::{AutoStartMode, AutoStartPolicy, Evaluation, ReasonCode};
pub use mode_timers::{ModeTimerSettings, ModeTimers};
pub use time_window::{TimeOfDay, TimeWindow};
