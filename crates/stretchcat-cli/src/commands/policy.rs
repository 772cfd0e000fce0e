//! Auto-start policy CLI commands.

use clap::Subcommand;
use stretchcat_core::{AutoStartMode, Config, FocusSignalSource};

use super::{focus_source, time_or_now};

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Evaluate the configured policy and print the result as JSON
    Check {
        /// Local time to evaluate at (HH:MM), defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Focus mode to assume, defaults to the current one
        #[arg(long)]
        focus: Option<String>,
    },
    /// List auto-start modes
    Modes,
}

pub fn run(action: PolicyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PolicyAction::Check { at, focus } => {
            let config = Config::load()?;
            let now = time_or_now(at.as_deref())?;
            let focus = focus.or_else(|| focus_source(&config).current_focus_mode());
            let evaluation = config
                .control_config()
                .policy
                .evaluate(now, focus.as_deref());
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        PolicyAction::Modes => {
            let current = Config::load_or_default().auto_start.mode;
            for mode in AutoStartMode::ALL {
                let marker = if mode == current { "*" } else { " " };
                println!("{marker} {:<28} {}", mode.as_str(), mode.description());
            }
        }
    }
    Ok(())
}
