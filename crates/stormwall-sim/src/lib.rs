//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "01-bootstrap"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Simulation engine module exports and shared types."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
//! Simulation of a web origin under legitimate and DDoS load.
//!
//! The [`Engine`] is advanced once per frame by an external scheduler. Each
//! tick generates offered traffic from the operator [`ControlInputs`], runs it
//! through the optional filtering layer, derives the load equilibrium and
//! smooths server health and latency toward it.

pub mod controls;
pub mod engine;
pub mod equilibrium;
pub mod errors;
pub mod mitigation;
pub mod scenario;
pub mod stats;
pub mod traffic;

pub use controls::{
    clamp_intensity, AttackType, CapacityTable, CapacityTier, ControlInputs, MAX_INTENSITY,
    MIN_INTENSITY,
};
pub use engine::{Engine, EngineSettings, SimulationState, TickMetrics, DEFAULT_TICK_RATE_HZ};
pub use equilibrium::{LoadAssessment, ServerStatus, BASELINE_LATENCY_MS, MAX_LATENCY_MS};
pub use errors::{Result, SimError};
pub use mitigation::{mitigate, MitigationOutcome};
pub use scenario::{ScenarioPlayer, ScenarioStep};
pub use stats::CumulativeStats;
pub use traffic::{attack_rps, legit_rps, OfferedTraffic};
