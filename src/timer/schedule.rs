//! Periodic tick source for the timer engine.
//!
//! The underlying `tokio::time::Interval` only exists while the engine is
//! counting. Every transition out of the counting phase drops it, so no
//! tick can reach a paused, on-break, ended or discarded session.

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Tick handle scoped to the counting sub-state.
#[derive(Debug)]
pub struct TickSchedule {
    period: Duration,
    interval: Option<Interval>,
    armed_count: u64,
    cancelled_count: u64,
}

impl TickSchedule {
    /// Creates a disarmed schedule with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
            armed_count: 0,
            cancelled_count: 0,
        }
    }

    /// Creates a disarmed one-second schedule.
    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Arms or cancels the interval to match whether the engine is counting.
    pub fn sync(&mut self, counting: bool) {
        match (counting, self.interval.is_some()) {
            (true, false) => self.arm(),
            (false, true) => self.cancel(),
            _ => {}
        }
    }

    /// Drops the interval if armed.
    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            self.cancelled_count += 1;
            debug!("tick schedule cancelled");
        }
    }

    /// Returns true while an interval is live.
    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Number of times an interval was created.
    pub fn armed_count(&self) -> u64 {
        self.armed_count
    }

    /// Number of times a live interval was dropped.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled_count
    }

    /// Waits for the next tick. Never completes while disarmed.
    pub async fn next(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    fn arm(&mut self) {
        // First tick lands one full period after arming
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        self.armed_count += 1;
        debug!(period_ms = self.period.as_millis() as u64, "tick schedule armed");
    }
}

impl Drop for TickSchedule {
    fn drop(&mut self) {
        self.cancel();
    }
}
