use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stretchcat", version, about = "StretchCat work/break reminder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show policy evaluation and timer state as JSON
    Status(commands::status::StatusArgs),
    /// Auto-start policy
    Policy {
        #[command(subcommand)]
        action: commands::policy::PolicyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Focus mode catalog and current mode
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Run the timer, reading commands from stdin and printing events
    Run(commands::run::RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Run(_) => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Status(args) => commands::status::run(args),
        Commands::Policy { action } => commands::policy::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Run(args) => commands::run::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
