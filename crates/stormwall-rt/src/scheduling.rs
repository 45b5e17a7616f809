//! ---
//! sw_section: "01-core-functionality"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Fixed-rate tick scheduler built on tokio intervals."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("tick rate must be positive and finite (got {0})")]
    InvalidRate(f64),
}

/// One scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    /// Zero-based frame index.
    pub sequence: u64,
    /// Wall-clock time since the previous frame; the nominal period for the first.
    pub elapsed: Duration,
    pub at: Instant,
}

/// Async pacer yielding frames at a fixed rate.
///
/// Late frames are delayed rather than bursted so the engine never sees a
/// run of near-zero frame times after a stall.
#[derive(Debug)]
pub struct TickScheduler {
    interval: Interval,
    period: Duration,
    sequence: u64,
    limit: Option<u64>,
    last: Option<Instant>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            period,
            sequence: 0,
            limit: None,
            last: None,
        }
    }

    pub fn from_rate(tick_rate_hz: f64) -> Result<Self, SchedulerError> {
        if !(tick_rate_hz.is_finite() && tick_rate_hz > 0.0) {
            return Err(SchedulerError::InvalidRate(tick_rate_hz));
        }
        Ok(Self::new(Duration::from_secs_f64(1.0 / tick_rate_hz)))
    }

    /// Stop after `ticks` frames.
    pub fn with_limit(mut self, ticks: Option<u64>) -> Self {
        self.limit = ticks;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn ticks_emitted(&self) -> u64 {
        self.sequence
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.limit, Some(limit) if self.sequence >= limit)
    }

    /// Wait for the next frame. Returns `None` once the limit is reached.
    pub async fn next(&mut self) -> Option<ScheduledTick> {
        if self.is_exhausted() {
            return None;
        }
        self.interval.tick().await;
        // Interval reports the scheduled deadline; frame time needs the actual one.
        let at = Instant::now();
        let elapsed = match self.last {
            Some(previous) => at.saturating_duration_since(previous),
            None => self.period,
        };
        if elapsed > self.period * 2 {
            debug!(
                target: "stormwall::rt",
                sequence = self.sequence,
                elapsed_us = elapsed.as_micros() as u64,
                "frame overran its period"
            );
        }
        self.last = Some(at);
        let tick = ScheduledTick {
            sequence: self.sequence,
            elapsed,
            at,
        };
        self.sequence += 1;
        Some(tick)
    }
}
