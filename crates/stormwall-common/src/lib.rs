//! ---
//! sw_section: "01-core-functionality"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Shared primitives and utilities for Stormwall hosts."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
//! Shared primitives for the Stormwall workspace: configuration loading,
//! tracing setup and frame timing helpers used by the daemon and CLI.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod time;

pub use config::{AppConfig, LoadedAppConfig, LoggingConfig, MetricsConfig, SimulationConfig};
pub use logging::{init_tracing, LogFormat};
pub use metrics::{FrameClock, JitterHistogram, JitterSummary};
