//! Fixed-period sampling timer.
//!
//! The timer does not spawn anything. Whoever owns the event loop asks it
//! whether a tick is due, which keeps every sample on the loop's thread.

use std::time::Duration;

use tokio::time::Instant;

/// Default sampling period: five minutes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// A cancellable, fixed-period timer.
///
/// The next tick is scheduled one period after the previous tick fired, so
/// a slow tick pushes later ticks back rather than bunching them up.
#[derive(Debug, Clone)]
pub struct SamplingTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl SamplingTimer {
    /// Create a stopped timer.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Start the timer with the first tick due at `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    /// Fire the timer if a tick is due, scheduling the next one.
    ///
    /// Returns `true` when the caller should run a tick.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending tick. A cancelled timer never fires again.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether a tick is scheduled.
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// When the next tick is due.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Time left before the next tick, zero if it is overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// The sampling period.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for SamplingTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
