//! Long-running timer process.
//!
//! Reads one command per line from stdin and prints every core event as a
//! JSON line on stdout. The focus mode is polled from the configured source
//! unless `--no-poll` is given, in which case only `focus NAME` changes it.

use clap::Args;
use stretchcat_core::focus::FocusPoller;
use stretchcat_core::{Config, ControlEvent, ControlHandle, ControlLoop, FocusSignal, ScheduleController};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{focus_source, poll_interval};

#[derive(Args)]
pub struct RunArgs {
    /// Do not poll the system focus mode
    #[arg(long)]
    no_poll: bool,
}

/// One stdin line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Control(ControlEvent),
    Focus(Option<String>),
    Reload,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "start" | "resume" => Command::Control(ControlEvent::Start),
        "pause" => Command::Control(ControlEvent::Pause),
        "reset" => Command::Control(ControlEvent::Reset),
        "break" => Command::Control(ControlEvent::StartBreak),
        "skip" => Command::Control(ControlEvent::SkipBreak),
        "lock" => Command::Control(ControlEvent::ScreenLocked),
        "unlock" => Command::Control(ControlEvent::ScreenUnlocked),
        "status" => Command::Control(ControlEvent::Snapshot),
        "focus" => Command::Focus((!rest.is_empty()).then(|| rest.to_string())),
        "reload" => Command::Reload,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let control = config.control_config();

    let mut controller = ScheduleController::new(&control);
    controller.set_on_break_start(Box::new(|| {
        tracing::info!("break started, time to stretch");
    }));
    let (control_loop, handle, mut events) = ControlLoop::new(controller, control);
    let loop_task = tokio::spawn(control_loop.run());

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
            }
        }
    });

    let poller = if args.no_poll {
        if let Some(mode) = config.focus.manual_mode() {
            handle
                .send(ControlEvent::FocusChanged(FocusSignal::manual(Some(mode))))
                .await?;
        }
        None
    } else {
        let poller = FocusPoller::new(focus_source(&config), poll_interval(&config));
        Some(poller.spawn(handle.sender()))
    };

    tracing::info!(mode = %config.auto_start.mode, "stretchcat running");
    read_commands(&handle).await?;
    handle.send(ControlEvent::Shutdown).await?;

    if let Some(poller) = poller {
        poller.abort();
    }
    let controller = loop_task.await?;
    printer.await?;
    tracing::info!(state = ?controller.timer().state(), "stretchcat stopped");
    Ok(())
}

/// Forward stdin commands until `quit`, end of input or Ctrl-C.
async fn read_commands(handle: &ControlHandle) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                return Ok(());
            }
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match command {
            Command::Control(event) => handle.send(event).await?,
            Command::Focus(mode) => {
                handle
                    .send(ControlEvent::FocusChanged(FocusSignal::manual(mode)))
                    .await?
            }
            Command::Reload => match Config::load() {
                Ok(config) => {
                    let control = Box::new(config.control_config());
                    handle.send(ControlEvent::ConfigChanged(control)).await?;
                }
                Err(e) => eprintln!("reload failed: {e}"),
            },
            Command::Quit => return Ok(()),
        }
    }
}
