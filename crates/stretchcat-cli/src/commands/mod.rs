pub mod config;
pub mod focus;
pub mod policy;
pub mod run;
pub mod status;

use std::time::Duration;

use stretchcat_core::focus::{
    load_mode_configurations, AssertionsFileSource, ModeConfigurations, ModeResolver,
};
use stretchcat_core::{Config, FocusSignalSource, ManualSource, TimeOfDay};

/// System focus modes, or an empty catalog when the platform file is missing.
pub fn system_modes(config: &Config) -> ModeConfigurations {
    let Some(path) = config.focus.mode_configurations_path() else {
        return ModeConfigurations::default();
    };
    match load_mode_configurations(&path) {
        Ok(modes) => modes,
        Err(e) => {
            tracing::debug!(error = %e, "system focus modes unavailable");
            ModeConfigurations::default()
        }
    }
}

pub fn resolver(config: &Config) -> ModeResolver {
    let mut resolver = ModeResolver::new(system_modes(config).identifiers);
    resolver.extend(config.focus.identifier_map.clone());
    resolver
}

/// The focus source configured for this machine. Falls back to the manual
/// mode when there is no assertions file location at all.
pub fn focus_source(config: &Config) -> Box<dyn FocusSignalSource> {
    match config.focus.assertions_path() {
        Some(path) => Box::new(
            AssertionsFileSource::new(path, resolver(config))
                .with_manual_fallback(config.focus.manual_mode()),
        ),
        None => Box::new(ManualSource::new(config.focus.manual_mode())),
    }
}

pub fn poll_interval(config: &Config) -> Duration {
    Duration::from_secs(config.focus.poll_interval_secs.max(1))
}

/// `--at HH:MM`, or the local wall clock.
pub fn time_or_now(at: Option<&str>) -> Result<TimeOfDay, Box<dyn std::error::Error>> {
    match at {
        Some(at) => Ok(at.parse()?),
        None => Ok(TimeOfDay::now_local()),
    }
}
