//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Legitimate and hostile traffic generation models."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use crate::controls::{clamp_intensity, ControlInputs, MAX_INTENSITY};

/// Attack rate at the lowest slider position's log-scale origin.
pub const MIN_ATTACK_RPS: f64 = 1_000.0;
/// Attack rate at full intensity.
pub const MAX_ATTACK_RPS: f64 = 20_000_000.0;
/// Share of the provisioned capacity that a full legitimate slider represents.
pub const LEGIT_CAPACITY_SHARE: f64 = 0.6;

/// Map an intensity onto `[MIN_ATTACK_RPS, MAX_ATTACK_RPS]` on a log scale.
///
/// Each slider step multiplies botnet output by a constant factor, so the
/// slider spans four orders of magnitude. The result is rounded to whole
/// requests; the endpoint is exact.
pub fn attack_rps(intensity: i32) -> f64 {
    let intensity = clamp_intensity(intensity);
    let log_min = MIN_ATTACK_RPS.ln();
    let log_max = MAX_ATTACK_RPS.ln();
    let scale = (log_max - log_min) / f64::from(MAX_INTENSITY);
    let rps = (log_min + scale * f64::from(intensity)).exp().round();
    rps.min(MAX_ATTACK_RPS)
}

/// Legitimate demand, proportional to the capacity currently provisioned.
pub fn legit_rps(enabled: bool, intensity: i32, capacity: f64) -> f64 {
    if !enabled {
        return 0.0;
    }
    let share = f64::from(clamp_intensity(intensity)) / 100.0;
    capacity * share * LEGIT_CAPACITY_SHARE
}

/// Offered load for one tick, before any filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferedTraffic {
    pub legit_rps: f64,
    pub attack_rps: f64,
}

impl OfferedTraffic {
    pub fn from_controls(controls: &ControlInputs, capacity: f64) -> Self {
        let attack = if controls.attack_enabled {
            attack_rps(controls.attack_intensity)
        } else {
            0.0
        };
        Self {
            legit_rps: legit_rps(controls.legit_enabled, controls.legit_intensity, capacity),
            attack_rps: attack,
        }
    }

    pub fn total_rps(&self) -> f64 {
        self.legit_rps + self.attack_rps
    }
}
