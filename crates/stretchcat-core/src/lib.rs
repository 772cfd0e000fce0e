//! # StretchCat Core Library
//!
//! Core logic for StretchCat, a work/break interval reminder. Every
//! operation is available through the standalone `stretchcat` CLI; any UI is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a one-second-granularity work/break state machine that the
//!   caller drives with `tick()`
//! - **Policy**: decides whether the timer may start and keep running, from
//!   a daily time window and the active focus mode
//! - **Focus**: pluggable sources telling which focus mode is on
//! - **Controller**: serializes ticks, focus changes, screen lock and user
//!   commands into one control loop
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: timer state machine
//! - [`AutoStartPolicy`]: auto-start evaluation
//! - [`ScheduleController`] / [`ControlLoop`]: the control loop
//! - [`Config`]: application configuration management

pub mod controller;
pub mod error;
pub mod events;
pub mod focus;
pub mod policy;
pub mod storage;
pub mod timer;

pub use controller::{ControlConfig, ControlEvent, ControlHandle, ControlLoop, ScheduleController};
pub use error::{ConfigError, CoreError, FocusError, ValidationError};
pub use events::Event;
pub use focus::{FocusSignal, FocusSignalSource, ManualSource};
pub use policy::{AutoStartMode, AutoStartPolicy, TimeOfDay, TimeWindow};
pub use storage::Config;
pub use timer::{IntervalTimer, PauseReason, Phase, TimerDurations, TimerState};
