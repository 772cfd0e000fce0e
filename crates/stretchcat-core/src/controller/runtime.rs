//! Tokio driver for the schedule controller.
//!
//! A single task owns the controller and consumes, in order of arrival:
//! the external event queue, the one-second interval clock, and the coarse
//! policy clock. Each event runs to completion before the next is taken,
//! so a tick can never interleave with a pause or a policy decision.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use super::{ControlConfig, ControlEvent, ScheduleController};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::policy::TimeOfDay;

/// How often the policy is re-evaluated without any other trigger.
pub const POLICY_INTERVAL: Duration = Duration::from_secs(60);

const QUEUE_CAPACITY: usize = 64;

type Clock = Box<dyn Fn() -> TimeOfDay + Send>;

/// Sending side of the control queue.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<ControlEvent>,
}

impl ControlHandle {
    pub async fn send(&self, event: ControlEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| CoreError::LoopClosed)
    }

    /// Raw sender, for producers such as the focus poller.
    pub fn sender(&self) -> mpsc::Sender<ControlEvent> {
        self.tx.clone()
    }
}

pub struct ControlLoop {
    controller: ScheduleController,
    config: ControlConfig,
    rx: mpsc::Receiver<ControlEvent>,
    events: mpsc::UnboundedSender<Event>,
    policy_interval: Duration,
    clock: Clock,
}

impl ControlLoop {
    /// Build the loop plus its input handle and output event stream.
    pub fn new(
        controller: ScheduleController,
        config: ControlConfig,
    ) -> (Self, ControlHandle, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let (events, events_rx) = mpsc::unbounded_channel();
        let control = Self {
            controller,
            config,
            rx,
            events,
            policy_interval: POLICY_INTERVAL,
            clock: Box::new(TimeOfDay::now_local),
        };
        (control, ControlHandle { tx }, events_rx)
    }

    pub fn with_policy_interval(mut self, interval: Duration) -> Self {
        self.policy_interval = interval;
        self
    }

    /// Replace the local wall clock, e.g. with a fixed time in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> TimeOfDay + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run until `Shutdown` arrives or every handle is dropped.
    /// The policy is evaluated once immediately on start.
    pub async fn run(mut self) -> ScheduleController {
        let second = Duration::from_secs(1);
        let mut seconds = tokio::time::interval_at(Instant::now() + second, second);
        seconds.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut policy = tokio::time::interval(self.policy_interval);
        policy.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(policy_interval_secs = self.policy_interval.as_secs(), "control loop started");
        loop {
            let event = tokio::select! {
                biased;
                received = self.rx.recv() => match received {
                    Some(ControlEvent::Shutdown) | None => break,
                    Some(event) => event,
                },
                _ = seconds.tick() => ControlEvent::SecondElapsed,
                _ = policy.tick() => ControlEvent::PolicyTick,
            };
            self.dispatch(event);
        }
        tracing::debug!("control loop stopped");
        self.controller
    }

    fn dispatch(&mut self, event: ControlEvent) {
        if let ControlEvent::ConfigChanged(config) = &event {
            self.config = (**config).clone();
        }
        let now = (self.clock)();
        for out in self.controller.handle(event, &self.config, now) {
            tracing::debug!(kind = out.kind(), "event");
            // A dropped receiver only means nobody is listening.
            let _ = self.events.send(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusSignal;
    use crate::policy::{AutoStartMode, AutoStartPolicy, ModeTimers, TimeWindow};
    use crate::timer::{PauseReason, TimerDurations, TimerState};

    fn config(mode: AutoStartMode) -> ControlConfig {
        ControlConfig {
            policy: AutoStartPolicy {
                mode,
                window: TimeWindow::default(),
                focus_modes: ["work".to_string()].into_iter().collect(),
            },
            durations: TimerDurations::from_minutes(1, 1),
            mode_timers: ModeTimers::default(),
        }
    }

    fn ten_am() -> TimeOfDay {
        TimeOfDay::new(10, 0).unwrap()
    }

    async fn next_timer_event(events: &mut mpsc::UnboundedReceiver<Event>) -> Event {
        loop {
            let event = events.recv().await.expect("loop closed");
            if !matches!(event, Event::ConditionsChanged { .. }) {
                return event;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn auto_started_timer_cycles_through_break() {
        let cfg = config(AutoStartMode::TimeWindow);
        let (control, handle, mut events) =
            ControlLoop::new(ScheduleController::new(&cfg), cfg.clone());
        let task = tokio::spawn(control.with_clock(ten_am).run());

        assert!(matches!(next_timer_event(&mut events).await, Event::WorkStarted { duration_secs: 60, .. }));
        assert!(matches!(next_timer_event(&mut events).await, Event::BreakStarted { duration_secs: 60, .. }));
        assert!(matches!(next_timer_event(&mut events).await, Event::WorkStarted { .. }));

        handle.send(ControlEvent::Shutdown).await.unwrap();
        let controller = task.await.unwrap();
        assert_eq!(controller.timer().state(), TimerState::Working);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_events_are_applied_in_order() {
        let cfg = config(AutoStartMode::FocusMode);
        let (control, handle, mut events) =
            ControlLoop::new(ScheduleController::new(&cfg), cfg.clone());
        let task = tokio::spawn(control.with_clock(ten_am).run());

        handle
            .send(ControlEvent::FocusChanged(FocusSignal::active("work")))
            .await
            .unwrap();
        assert!(matches!(next_timer_event(&mut events).await, Event::FocusModeChanged { .. }));
        assert!(matches!(next_timer_event(&mut events).await, Event::WorkStarted { .. }));

        handle.send(ControlEvent::ScreenLocked).await.unwrap();
        assert!(matches!(next_timer_event(&mut events).await, Event::ScreenLocked { .. }));
        assert!(matches!(
            next_timer_event(&mut events).await,
            Event::TimerPaused { reason: PauseReason::ScreenLocked, .. }
        ));

        drop(handle);
        let controller = task.await.unwrap();
        assert!(controller.resume_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn config_change_replaces_snapshot() {
        let cfg = config(AutoStartMode::Manual);
        let (control, handle, mut events) =
            ControlLoop::new(ScheduleController::new(&cfg), cfg.clone());
        let task = tokio::spawn(control.with_clock(ten_am).run());

        let mut longer = cfg.clone();
        longer.durations = TimerDurations::from_minutes(5, 1);
        handle
            .send(ControlEvent::ConfigChanged(Box::new(longer)))
            .await
            .unwrap();
        assert!(matches!(
            next_timer_event(&mut events).await,
            Event::DurationsUpdated { work_secs: 300, .. }
        ));

        handle.send(ControlEvent::Shutdown).await.unwrap();
        let controller = task.await.unwrap();
        assert_eq!(controller.timer().total_secs(), 300);
    }
}
