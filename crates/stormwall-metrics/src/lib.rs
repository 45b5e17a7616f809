//! ---
//! sw_section: "04-observability"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Prometheus registry handling and metric exports."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::sync::Arc;

use prometheus::Registry;

pub mod server;
pub mod simulation;

pub use server::{spawn_http_server, MetricsServer};
pub use simulation::SimulationMetrics;

/// Shared registry type used across hosts.
pub type SharedRegistry = Arc<Registry>;

/// Produce a new shared registry.
pub fn new_registry() -> SharedRegistry {
    Arc::new(Registry::new())
}

pub use prometheus;
