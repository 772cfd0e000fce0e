use clap::Args;
use serde::Serialize;
use stretchcat_core::policy::Evaluation;
use stretchcat_core::timer::TimerStatus;
use stretchcat_core::{Config, ControlEvent, FocusSignal, FocusSignalSource, ScheduleController};

use super::{focus_source, time_or_now};

#[derive(Args)]
pub struct StatusArgs {
    /// Evaluate at this local time (HH:MM) instead of now
    #[arg(long)]
    at: Option<String>,
    /// Pretend this focus mode is active instead of reading it
    #[arg(long)]
    focus: Option<String>,
}

#[derive(Serialize)]
struct StatusReport {
    at: String,
    focus_mode: Option<String>,
    evaluation: Evaluation,
    should_auto_start: bool,
    allowed_to_run: bool,
    timer: TimerStatus,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let control = config.control_config();
    let now = time_or_now(args.at.as_deref())?;
    let focus = match args.focus {
        Some(mode) => Some(mode),
        None => focus_source(&config).current_focus_mode(),
    };

    // What a freshly started timer would do right now.
    let mut controller = ScheduleController::new(&control);
    let signal = FocusSignal::manual(focus.clone());
    controller.handle(ControlEvent::FocusChanged(signal), &control, now);

    let report = StatusReport {
        at: now.to_string(),
        evaluation: control.policy.evaluate(now, focus.as_deref()),
        should_auto_start: control.policy.should_auto_start(now, focus.as_deref()),
        allowed_to_run: control.policy.is_allowed_to_run(now, focus.as_deref()),
        focus_mode: focus,
        timer: controller.timer().status(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
