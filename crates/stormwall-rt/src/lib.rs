//! ---
//! sw_section: "01-core-functionality"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Runtime helpers that pace the simulation loop."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
//! Frame pacing for hosts that advance the simulation in real time.

pub mod scheduling;

pub use scheduling::{ScheduledTick, SchedulerError, TickScheduler};
