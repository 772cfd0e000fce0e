use clap::Subcommand;
use stretchcat_core::focus::available_modes;
use stretchcat_core::{Config, FocusSignalSource};

use super::{focus_source, system_modes};

#[derive(Subcommand)]
pub enum FocusAction {
    /// List selectable focus modes (system and user-defined)
    Modes,
    /// Add a user-defined focus mode
    Add {
        name: String,
    },
    /// Remove a user-defined focus mode
    Remove {
        name: String,
    },
    /// Print the current focus reading as JSON
    Current,
    /// Set the manual focus mode; omit NAME to clear it
    Set {
        name: Option<String>,
    },
}

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FocusAction::Modes => {
            let config = Config::load()?;
            let system = system_modes(&config).names;
            let selected = &config.auto_start.selected_focus_modes;
            for mode in available_modes(&system, &config.focus.user_defined_modes) {
                let marker = if selected.contains(&mode) { "*" } else { " " };
                println!("{marker} {mode}");
            }
        }
        FocusAction::Add { name } => {
            let mut config = Config::load()?;
            if config.focus.add_user_mode(&name) {
                config.save()?;
                println!("added: {}", name.trim());
            } else {
                println!("already present: {}", name.trim());
            }
        }
        FocusAction::Remove { name } => {
            let mut config = Config::load()?;
            if config.focus.remove_user_mode(&name) {
                config.save()?;
                println!("removed: {name}");
            } else {
                eprintln!("not a user-defined mode: {name}");
                std::process::exit(1);
            }
        }
        FocusAction::Current => {
            let config = Config::load()?;
            let signal = focus_source(&config).read_or_inactive();
            println!("{}", serde_json::to_string_pretty(&signal)?);
        }
        FocusAction::Set { name } => {
            let mut config = Config::load()?;
            config.focus.manual_mode = name.unwrap_or_default().trim().to_string();
            config.save()?;
            match config.focus.manual_mode() {
                Some(mode) => println!("manual focus mode: {mode}"),
                None => println!("manual focus mode cleared"),
            }
        }
    }
    Ok(())
}
