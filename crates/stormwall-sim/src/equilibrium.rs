//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Load equilibrium, smoothing and server status derivation."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::controls::AttackType;

/// Latency of an idle origin.
pub const BASELINE_LATENCY_MS: f64 = 24.0;
/// Ceiling for reported latency.
pub const MAX_LATENCY_MS: f64 = 9_999.0;
/// Load ratio where queuing delay starts to build.
pub const CONGESTION_KNEE: f64 = 0.8;
/// Fraction of the availability gap closed per tick.
pub const HEALTH_INERTIA: f64 = 0.1;
/// Fraction of the latency gap closed per tick.
pub const LATENCY_INERTIA: f64 = 0.05;

/// Origin compute cost of one allowed attack request relative to a legitimate one.
pub fn attack_weight(attack_type: AttackType) -> f64 {
    match attack_type {
        AttackType::Volumetric => 1.0,
        AttackType::Application => 4.0,
    }
}

/// Weighted demand against capacity for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAssessment {
    pub total_demand: f64,
    pub load_ratio: f64,
}

impl LoadAssessment {
    pub fn compute(
        legit_rps: f64,
        allowed_attack_rps: f64,
        attack_type: AttackType,
        capacity: f64,
    ) -> Self {
        let total_demand = legit_rps + allowed_attack_rps * attack_weight(attack_type);
        Self {
            total_demand,
            load_ratio: total_demand / capacity,
        }
    }

    /// Utilisation in percent. Values above 100 are meaningful and never clamped.
    pub fn load_percent(&self) -> f64 {
        self.load_ratio * 100.0
    }

    /// Share of demand the origin can serve once it is oversubscribed.
    pub fn target_availability(&self) -> f64 {
        if self.load_ratio > 1.0 {
            100.0 / self.load_ratio
        } else {
            100.0
        }
    }

    /// Steady-state latency; grows super-linearly past the congestion knee.
    pub fn target_latency_ms(&self) -> f64 {
        let latency = if self.load_ratio > CONGESTION_KNEE {
            let congestion = self.load_ratio - CONGESTION_KNEE;
            BASELINE_LATENCY_MS + (congestion * 10.0).powf(2.5) * 10.0
        } else {
            BASELINE_LATENCY_MS
        };
        latency.min(MAX_LATENCY_MS)
    }
}

/// Move `current` toward `target` by `inertia` of the remaining gap.
pub fn smooth(current: f64, target: f64, inertia: f64) -> f64 {
    current + (target - current) * inertia
}

/// Server status as shown to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    Online,
    Degraded,
    Critical,
    Offline,
}

impl ServerStatus {
    pub const ALL: [ServerStatus; 4] = [
        ServerStatus::Online,
        ServerStatus::Degraded,
        ServerStatus::Critical,
        ServerStatus::Offline,
    ];

    /// Derive status from the current smoothed state alone.
    ///
    /// There is no memory of the previous status, so values hovering at a
    /// threshold may alternate between ticks.
    pub fn derive(health: f64, latency_ms: f64) -> Self {
        if health < 5.0 {
            ServerStatus::Offline
        } else if health < 60.0 {
            ServerStatus::Critical
        } else if latency_ms > 500.0 {
            ServerStatus::Degraded
        } else {
            ServerStatus::Online
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Online => "ONLINE",
            ServerStatus::Degraded => "DEGRADED",
            ServerStatus::Critical => "CRITICAL",
            ServerStatus::Offline => "OFFLINE",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
