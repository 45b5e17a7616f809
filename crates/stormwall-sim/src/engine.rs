//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Tick-driven simulation engine."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::controls::{CapacityTable, ControlInputs};
use crate::equilibrium::{
    smooth, LoadAssessment, ServerStatus, BASELINE_LATENCY_MS, HEALTH_INERTIA, LATENCY_INERTIA,
    MAX_LATENCY_MS,
};
use crate::errors::{Result, SimError};
use crate::mitigation::mitigate;
use crate::stats::{CumulativeStats, StepCounts};
use crate::traffic::OfferedTraffic;

/// Nominal host refresh rate.
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

/// Smoothed server state carried from one tick to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Percentage of demand being served, in `[0, 100]`.
    pub health: f64,
    /// Observed response latency, in `[24, 9999]` ms.
    pub latency_ms: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            health: 100.0,
            latency_ms: BASELINE_LATENCY_MS,
        }
    }
}

impl SimulationState {
    pub fn status(&self) -> ServerStatus {
        ServerStatus::derive(self.health, self.latency_ms)
    }
}

/// Metrics derived during a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickMetrics {
    pub tick: u64,
    pub current_rps: u64,
    pub current_legit_rps: u64,
    pub current_attack_rps: u64,
    pub load_percent: f64,
    pub waf_integrity_percent: u32,
    pub mitigation_active: bool,
    pub health: f64,
    pub latency_ms: f64,
    pub status: ServerStatus,
}

/// Static engine parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub capacities: CapacityTable,
    /// Tick rate assumed by [`Engine::tick`] when converting rates to counts.
    pub tick_rate_hz: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            capacities: CapacityTable::default(),
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

/// Simulated origin server under legitimate and hostile load.
///
/// The engine performs no timing of its own: a host calls [`Engine::tick`]
/// once per frame and may swap controls with [`Engine::configure`] between
/// ticks.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: EngineSettings,
    controls: ControlInputs,
    capacity: f64,
    state: SimulationState,
    stats: CumulativeStats,
    ticks: u64,
}

impl Engine {
    /// Build an engine with the given settings and initial controls.
    pub fn new(settings: EngineSettings, controls: ControlInputs) -> Result<Self> {
        if !settings.tick_rate_hz.is_finite() || settings.tick_rate_hz <= 0.0 {
            return Err(SimError::InvalidTickRate(settings.tick_rate_hz));
        }
        settings.capacities.validate()?;
        let controls = controls.clamped();
        let capacity = settings.capacities.checked_capacity(controls.capacity_tier)?;
        Ok(Self {
            settings,
            controls,
            capacity,
            state: SimulationState::default(),
            stats: CumulativeStats::default(),
            ticks: 0,
        })
    }

    /// Engine with stock capacities, a 60 Hz cadence and start-up controls.
    pub fn with_defaults() -> Self {
        Self {
            settings: EngineSettings::default(),
            controls: ControlInputs::default(),
            capacity: CapacityTable::default().off,
            state: SimulationState::default(),
            stats: CumulativeStats::default(),
            ticks: 0,
        }
    }

    /// Replace the control inputs. Returns the effective (clamped) inputs.
    pub fn configure(&mut self, controls: ControlInputs) -> Result<ControlInputs> {
        let controls = controls.clamped();
        let capacity = self
            .settings
            .capacities
            .checked_capacity(controls.capacity_tier)?;
        if controls != self.controls {
            debug!(
                target: "stormwall::sim::engine",
                tick = self.ticks,
                attack = controls.attack_enabled,
                attack_intensity = controls.attack_intensity,
                attack_type = %controls.attack_type,
                legit = controls.legit_enabled,
                legit_intensity = controls.legit_intensity,
                mitigation = controls.mitigation_enabled,
                tier = %controls.capacity_tier,
                "controls updated"
            );
        }
        self.controls = controls;
        self.capacity = capacity;
        Ok(controls)
    }

    /// Advance one frame at the configured tick rate.
    pub fn tick(&mut self) -> TickMetrics {
        let dt_secs = 1.0 / self.settings.tick_rate_hz;
        self.step(dt_secs)
    }

    /// Advance one frame, converting rates to counts over the measured `elapsed` time.
    pub fn tick_elapsed(&mut self, elapsed: Duration) -> TickMetrics {
        self.step(elapsed.as_secs_f64())
    }

    fn step(&mut self, dt_secs: f64) -> TickMetrics {
        let controls = self.controls;
        let capacity = self.capacity;

        let offered = OfferedTraffic::from_controls(&controls, capacity);
        let mitigation = mitigate(
            controls.mitigation_enabled,
            controls.attack_type,
            offered.attack_rps,
            capacity,
        );
        let load = LoadAssessment::compute(
            offered.legit_rps,
            mitigation.allowed_rps,
            controls.attack_type,
            capacity,
        );

        let health = smooth(self.state.health, load.target_availability(), HEALTH_INERTIA)
            .clamp(0.0, 100.0);
        let latency_ms = smooth(
            self.state.latency_ms,
            load.target_latency_ms(),
            LATENCY_INERTIA,
        )
        .clamp(BASELINE_LATENCY_MS, MAX_LATENCY_MS);

        let counts = StepCounts::compute(
            load.total_demand,
            mitigation.blocked_rps,
            offered.legit_rps,
            health,
            dt_secs,
        );
        let status = ServerStatus::derive(health, latency_ms);
        let tick = self.ticks + 1;

        self.state = SimulationState { health, latency_ms };
        self.stats.accumulate(&counts);
        self.ticks = tick;

        trace!(
            target: "stormwall::sim::engine",
            tick,
            load_ratio = load.load_ratio,
            health,
            latency_ms,
            status = %status,
            "tick"
        );

        TickMetrics {
            tick,
            current_rps: offered.total_rps().floor() as u64,
            current_legit_rps: offered.legit_rps.floor() as u64,
            current_attack_rps: offered.attack_rps.floor() as u64,
            load_percent: load.load_percent(),
            waf_integrity_percent: mitigation.integrity_percent(),
            mitigation_active: mitigation.active,
            health,
            latency_ms,
            status,
        }
    }

    /// Copy of the cumulative counters.
    pub fn snapshot_stats(&self) -> CumulativeStats {
        self.stats
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn controls(&self) -> ControlInputs {
        self.controls
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Capacity of the active tier, in requests per second.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
