use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{FocusSignal, FocusSignalSource};
use crate::controller::ControlEvent;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls a focus source and reports only readings that differ from the
/// previous one. This is the change notification the controller listens to.
pub struct FocusPoller {
    source: Box<dyn FocusSignalSource>,
    interval: Duration,
    last: Option<FocusSignal>,
}

impl FocusPoller {
    pub fn new(source: Box<dyn FocusSignalSource>, interval: Duration) -> Self {
        Self {
            source,
            interval: interval.max(Duration::from_millis(100)),
            last: None,
        }
    }

    /// Take one reading. `Some` when it changed since the last call.
    pub fn poll_once(&mut self) -> Option<FocusSignal> {
        let signal = self.source.read_or_inactive();
        if self.last.as_ref() == Some(&signal) {
            return None;
        }
        tracing::debug!(source = self.source.name(), mode = ?signal.current_mode, "focus reading changed");
        self.last = Some(signal.clone());
        Some(signal)
    }

    /// Run on the current tokio runtime until the receiving side goes away.
    pub fn spawn(mut self, tx: mpsc::Sender<ControlEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Some(signal) = self.poll_once() {
                    if tx.send(ControlEvent::FocusChanged(signal)).await.is_err() {
                        tracing::debug!("control loop closed, stopping focus poller");
                        break;
                    }
                }
            }
        })
    }
}
