use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_MINUTES: u32 = 30;
pub const DEFAULT_BREAK_MINUTES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

/// Work and break lengths in seconds.
///
/// Zero is accepted and evaluated literally: a zero-length phase ends on
/// the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    pub work_secs: u64,
    pub break_secs: u64,
}

impl TimerDurations {
    /// Uses saturating arithmetic so oversized minute values cannot overflow.
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_secs: u64::from(work_minutes).saturating_mul(60),
            break_secs: u64::from(break_minutes).saturating_mul(60),
        }
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty_and_two_minutes() {
        let d = TimerDurations::default();
        assert_eq!(d.work_secs, 30 * 60);
        assert_eq!(d.break_secs, 2 * 60);
    }

    #[test]
    fn for_phase_picks_matching_length() {
        let d = TimerDurations::from_minutes(25, 5);
        assert_eq!(d.for_phase(Phase::Work), 1500);
        assert_eq!(d.for_phase(Phase::Break), 300);
    }

    #[test]
    fn large_minutes_do_not_overflow() {
        let d = TimerDurations::from_minutes(u32::MAX, u32::MAX);
        assert_eq!(d.work_secs, u64::from(u32::MAX) * 60);
    }
}
