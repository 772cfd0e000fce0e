//! Focus-mode signal: where "which focus mode is on right now" comes from.
//!
//! The core only depends on [`FocusSignalSource`]. Readings are best-effort;
//! a source that cannot resolve anything reports an error, which callers
//! turn into "no focus mode active" rather than propagating.

mod assertions;
mod catalog;
mod poller;
mod resolver;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::FocusError;

pub use assertions::{active_mode_identifiers, AssertionsFileSource};
pub use catalog::{
    available_modes, default_db_dir, load_mode_configurations, parse_mode_configurations,
    ModeConfigurations, DEFAULT_SYSTEM_MODES,
};
pub use poller::{FocusPoller, DEFAULT_POLL_INTERVAL};
pub use resolver::ModeResolver;

/// One reading of the focus state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusSignal {
    /// Mode name the policy matches against.
    pub current_mode: Option<String>,
    /// True when the OS reported an active focus assertion. A mode chosen
    /// by hand is reported with `active == false`.
    pub active: bool,
}

impl FocusSignal {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn active(mode: impl Into<String>) -> Self {
        Self {
            current_mode: Some(mode.into()),
            active: true,
        }
    }

    pub fn manual(mode: Option<String>) -> Self {
        Self {
            current_mode: mode,
            active: false,
        }
    }
}

/// Anything that can say which focus mode is currently on.
pub trait FocusSignalSource: Send {
    /// Short identifier for log lines.
    fn name(&self) -> &str;

    /// Take a fresh reading.
    fn read(&mut self) -> Result<FocusSignal, FocusError>;

    /// Reading with failures logged and mapped to "inactive".
    fn read_or_inactive(&mut self) -> FocusSignal {
        match self.read() {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!(source = self.name(), error = %e, "focus mode unresolved, treating as inactive");
                FocusSignal::inactive()
            }
        }
    }

    fn current_focus_mode(&mut self) -> Option<String> {
        self.read_or_inactive().current_mode
    }
}

/// Focus source driven by hand, e.g. from a CLI command.
///
/// Clones share the same slot, so one clone can be handed to a poller while
/// another is kept to change the mode.
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    mode: Arc<Mutex<Option<String>>>,
}

impl ManualSource {
    pub fn new(mode: Option<String>) -> Self {
        Self {
            mode: Arc::new(Mutex::new(mode)),
        }
    }

    pub fn set(&self, mode: Option<String>) {
        match self.mode.lock() {
            Ok(mut slot) => *slot = mode,
            Err(poisoned) => *poisoned.into_inner() = mode,
        }
    }
}

impl FocusSignalSource for ManualSource {
    fn name(&self) -> &str {
        "manual"
    }

    fn read(&mut self) -> Result<FocusSignal, FocusError> {
        let slot = self
            .mode
            .lock()
            .map_err(|_| FocusError::Unavailable(self.name().to_string()))?;
        Ok(FocusSignal::manual(slot.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl FocusSignalSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn read(&mut self) -> Result<FocusSignal, FocusError> {
            Err(FocusError::Unavailable("broken".into()))
        }
    }

    #[test]
    fn failed_reading_counts_as_inactive() {
        let mut source = Broken;
        assert_eq!(source.read_or_inactive(), FocusSignal::inactive());
        assert_eq!(source.current_focus_mode(), None);
    }

    #[test]
    fn manual_clones_share_the_mode() {
        let control = ManualSource::default();
        let mut reader = control.clone();
        assert_eq!(reader.current_focus_mode(), None);
        control.set(Some("Work".into()));
        assert_eq!(reader.current_focus_mode().as_deref(), Some("Work"));
        assert!(!reader.read().unwrap().active);
    }
}
