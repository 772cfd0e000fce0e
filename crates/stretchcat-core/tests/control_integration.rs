//! Integration tests for the control loop.
//!
//! These tests wire configuration, focus sources, the controller and the
//! tokio runtime together the way the CLI daemon does.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use stretchcat_core::focus::{AssertionsFileSource, FocusPoller, ModeResolver};
use stretchcat_core::{
    Config, ControlEvent, ControlLoop, Event, FocusSignal, PauseReason, Phase,
    ScheduleController, TimeOfDay, TimerState,
};
use tokio::sync::mpsc;

const NO_ASSERTIONS: &str = r#"{ "data": [] }"#;

const WORK_ASSERTION: &str = r#"{
    "data": [{
        "storeAssertionRecords": [
            { "assertionDetails": { "assertionDetailsModeIdentifier": "com.apple.focus.work" } }
        ]
    }]
}"#;

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn config(settings: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    for (key, value) in settings {
        config.set(key, value).unwrap();
    }
    config
}

async fn next_timer_event(events: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    loop {
        let event = events.recv().await.expect("control loop closed");
        if !matches!(event, Event::ConditionsChanged { .. }) {
            return event;
        }
    }
}

fn write_assertions(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_focus_mode_drives_timer_through_poller() {
    let dir = tempfile::tempdir().unwrap();
    let assertions = dir.path().join("Assertions.json");
    write_assertions(&assertions, NO_ASSERTIONS);

    let cfg = config(&[
        ("auto_start.mode", "focus_mode"),
        ("auto_start.selected_focus_modes", "Work"),
        ("timer.work_minutes", "1"),
    ]);
    let control = cfg.control_config();
    let (control_loop, handle, mut events) =
        ControlLoop::new(ScheduleController::new(&control), control);
    let task = tokio::spawn(control_loop.with_clock(|| t("10:00")).run());

    let source = AssertionsFileSource::new(&assertions, ModeResolver::default());
    let poller = FocusPoller::new(Box::new(source), Duration::from_secs(1)).spawn(handle.sender());

    // Initial evaluation: no focus mode, nothing starts.
    assert!(matches!(
        events.recv().await,
        Some(Event::ConditionsChanged { satisfied: false, .. })
    ));
    tokio::time::sleep(Duration::from_millis(500)).await;

    write_assertions(&assertions, WORK_ASSERTION);
    match next_timer_event(&mut events).await {
        Event::FocusModeChanged { mode, .. } => assert_eq!(mode.as_deref(), Some("Work")),
        other => panic!("expected focus change, got {other:?}"),
    }
    assert!(matches!(
        next_timer_event(&mut events).await,
        Event::WorkStarted { duration_secs: 60, .. }
    ));

    write_assertions(&assertions, NO_ASSERTIONS);
    assert!(matches!(
        next_timer_event(&mut events).await,
        Event::FocusModeChanged { mode: None, .. }
    ));
    match next_timer_event(&mut events).await {
        Event::TimerPaused {
            phase,
            reason,
            remaining_secs,
            ..
        } => {
            assert_eq!(phase, Phase::Work);
            assert_eq!(reason, PauseReason::PolicyBlocked);
            assert!(remaining_secs > 0 && remaining_secs <= 60);
        }
        other => panic!("expected pause, got {other:?}"),
    }

    poller.abort();
    handle.send(ControlEvent::Shutdown).await.unwrap();
    let controller = task.await.unwrap();
    assert_eq!(controller.focus(), &FocusSignal::inactive());
    assert_eq!(
        controller.timer().state().pause_reason(),
        Some(PauseReason::PolicyBlocked)
    );
}

#[tokio::test(start_paused = true)]
async fn test_break_callback_fires_once_per_break() {
    let cfg = config(&[("timer.work_minutes", "1"), ("timer.break_minutes", "1")]);
    let control = cfg.control_config();
    let breaks = Arc::new(AtomicUsize::new(0));

    let mut controller = ScheduleController::new(&control);
    let counter = Arc::clone(&breaks);
    controller.set_on_break_start(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let (control_loop, handle, mut events) = ControlLoop::new(controller, control);
    let task = tokio::spawn(control_loop.with_clock(|| t("10:00")).run());

    handle.send(ControlEvent::Start).await.unwrap();
    assert!(matches!(next_timer_event(&mut events).await, Event::WorkStarted { .. }));
    assert!(matches!(
        next_timer_event(&mut events).await,
        Event::BreakStarted { duration_secs: 60, .. }
    ));
    assert_eq!(breaks.load(Ordering::SeqCst), 1);
    assert!(matches!(next_timer_event(&mut events).await, Event::WorkStarted { .. }));
    assert_eq!(breaks.load(Ordering::SeqCst), 1);

    handle.send(ControlEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[test]
fn test_per_mode_durations_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [timer]
        work_minutes = 25
        break_minutes = 5

        [auto_start]
        mode = "time_window"

        [mode_timers]
        use_per_mode_settings = true

        [mode_timers.modes.Work]
        work_minutes = 50
        break_minutes = 10
        "#,
    )
    .unwrap();
    let control = Config::load_from(&path).unwrap().control_config();

    let mut controller = ScheduleController::new(&control);
    controller.handle(
        ControlEvent::FocusChanged(FocusSignal::active("Work")),
        &control,
        t("10:00"),
    );
    assert_eq!(controller.timer().state(), TimerState::Working);
    assert_eq!(controller.timer().remaining_secs(), 50 * 60);

    controller.handle(ControlEvent::Reset, &control, t("10:00"));
    controller.handle(
        ControlEvent::FocusChanged(FocusSignal::active("Personal")),
        &control,
        t("10:00"),
    );
    assert_eq!(controller.timer().state(), TimerState::Working);
    assert_eq!(controller.timer().remaining_secs(), 25 * 60);
}

#[test]
fn test_user_pause_survives_lock_and_policy() {
    let control = config(&[("auto_start.mode", "time_window")]).control_config();
    let mut controller = ScheduleController::new(&control);
    let now = t("10:00");

    controller.handle(ControlEvent::PolicyTick, &control, now);
    assert_eq!(controller.timer().state(), TimerState::Working);

    controller.handle(ControlEvent::Pause, &control, now);
    controller.handle(ControlEvent::ScreenLocked, &control, now);
    assert!(!controller.resume_pending());
    controller.handle(ControlEvent::ScreenUnlocked, &control, now);
    controller.handle(ControlEvent::PolicyTick, &control, now);
    assert_eq!(
        controller.timer().state().pause_reason(),
        Some(PauseReason::UserRequested)
    );

    controller.handle(ControlEvent::Start, &control, now);
    assert_eq!(controller.timer().state(), TimerState::Working);
}

#[test]
fn test_overnight_window_from_config() {
    let control = config(&[
        ("auto_start.mode", "time_window"),
        ("auto_start.start_time", "22:00"),
        ("auto_start.end_time", "06:00"),
    ])
    .control_config();
    let mut controller = ScheduleController::new(&control);

    controller.handle(ControlEvent::PolicyTick, &control, t("21:59"));
    assert_eq!(controller.timer().state(), TimerState::Idle);

    controller.handle(ControlEvent::PolicyTick, &control, t("23:30"));
    assert_eq!(controller.timer().state(), TimerState::Working);

    controller.handle(ControlEvent::PolicyTick, &control, t("06:00"));
    assert_eq!(controller.timer().state(), TimerState::Working);

    let events = controller.handle(ControlEvent::PolicyTick, &control, t("06:01"));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimerPaused { reason: PauseReason::PolicyBlocked, .. })));

    let events = controller.handle(ControlEvent::PolicyTick, &control, t("22:00"));
    assert!(events.iter().any(|e| matches!(e, Event::TimerResumed { .. })));
}
