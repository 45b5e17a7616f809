//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Cumulative request accounting."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Monotonic request counters accumulated since the engine was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeStats {
    pub total_requests: u64,
    pub blocked_requests: u64,
    pub dropped_legitimate: u64,
    pub successful_legitimate: u64,
}

/// Whole requests seen during one step, derived from per-second rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounts {
    pub total: u64,
    pub blocked: u64,
    pub dropped_legitimate: u64,
    pub successful_legitimate: u64,
}

/// Convert a per-second rate into whole requests over `dt_secs`, flooring.
///
/// Negative or non-finite inputs contribute nothing.
pub fn requests_in(rate_per_sec: f64, dt_secs: f64) -> u64 {
    let count = (rate_per_sec * dt_secs).floor();
    if count.is_finite() && count > 0.0 {
        count as u64
    } else {
        0
    }
}

impl StepCounts {
    /// Count requests for one step.
    ///
    /// `health` is the post-smoothing health of the step and splits legitimate
    /// traffic into served and dropped shares.
    pub fn compute(
        total_demand: f64,
        blocked_rps: f64,
        legit_rps: f64,
        health: f64,
        dt_secs: f64,
    ) -> Self {
        let drop_rate = 1.0 - health / 100.0;
        let legit_drops = legit_rps * drop_rate;
        let legit_success = legit_rps - legit_drops;
        Self {
            total: requests_in(total_demand + blocked_rps, dt_secs),
            blocked: requests_in(blocked_rps, dt_secs),
            dropped_legitimate: requests_in(legit_drops, dt_secs),
            successful_legitimate: requests_in(legit_success, dt_secs),
        }
    }
}

impl CumulativeStats {
    pub fn accumulate(&mut self, step: &StepCounts) {
        self.total_requests = self.total_requests.saturating_add(step.total);
        self.blocked_requests = self.blocked_requests.saturating_add(step.blocked);
        self.dropped_legitimate = self
            .dropped_legitimate
            .saturating_add(step.dropped_legitimate);
        self.successful_legitimate = self
            .successful_legitimate
            .saturating_add(step.successful_legitimate);
    }

    /// Share of legitimate requests that were dropped, in percent.
    pub fn legit_drop_percent(&self) -> f64 {
        let legit = self.dropped_legitimate + self.successful_legitimate;
        if legit == 0 {
            0.0
        } else {
            self.dropped_legitimate as f64 / legit as f64 * 100.0
        }
    }
}
