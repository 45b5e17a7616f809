//! ---
//! sw_section: "03-logging"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Simulation-aware structured logging helpers."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Logging helpers that stamp events with the simulation context they
//! belong to (scenario, tick, server status and capacity tier).

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

#[doc(hidden)]
pub use tracing;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "STORMWALL_LOG";

/// Initialize a stderr subscriber for short-lived tools.
///
/// Stdout is left untouched so command output stays machine readable.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = Registry::default()
        .with(filter)
        .with(subscriber_fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Structured context attached to events by the `sw_*` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogContext<'a> {
    /// Scenario name or file driving the run.
    pub scenario: Option<&'a str>,
    /// Simulation tick the event refers to.
    pub tick: Option<u64>,
    /// Server status label at the time of the event.
    pub status: Option<&'a str>,
    /// Capacity tier in effect.
    pub tier: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a scenario name.
    pub fn with_scenario(mut self, scenario: &'a str) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Attach a tick value.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attach a status label.
    pub fn with_status(mut self, status: &'a str) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a capacity tier label.
    pub fn with_tier(mut self, tier: &'a str) -> Self {
        self.tier = Some(tier);
        self
    }
}

/// Outcome of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEventOutcome {
    /// The operation completed.
    Success,
    /// The operation completed with a condition worth attention.
    Warning,
    /// The operation failed or was aborted.
    Fault,
}

impl SystemEventOutcome {
    /// Lowercase label recorded in the `outcome` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemEventOutcome::Success => "success",
            SystemEventOutcome::Warning => "warning",
            SystemEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a lifecycle event (startup, shutdown, scenario load) with its outcome.
pub fn log_system_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: SystemEventOutcome,
) {
    let ctx = context.copied().unwrap_or_default();
    let outcome_label = outcome.as_str();
    match outcome {
        SystemEventOutcome::Fault => crate::sw_event!(
            Level::ERROR,
            ctx,
            [event = event, outcome = outcome_label,],
            "{}",
            message
        ),
        SystemEventOutcome::Warning => crate::sw_event!(
            Level::WARN,
            ctx,
            [event = event, outcome = outcome_label,],
            "{}",
            message
        ),
        SystemEventOutcome::Success => crate::sw_event!(
            Level::INFO,
            ctx,
            [event = event, outcome = outcome_label,],
            "{}",
            message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new()
            .with_scenario("flood.json")
            .with_tick(120)
            .with_status("CRITICAL")
            .with_tier("off");
        sw_info!(context = ctx, "status changed");
        sw_debug!("debug message");
        sw_warn!(context = ctx, "latency {}ms", 812);
        sw_error!(context = ctx, "server offline after {} ticks", 42);
    }

    #[test]
    fn context_builder_sets_fields() {
        let ctx = LogContext::new().with_tick(7).with_tier("ultra");
        assert_eq!(ctx.tick, Some(7));
        assert_eq!(ctx.tier, Some("ultra"));
        assert!(ctx.scenario.is_none());
        assert!(ctx.status.is_none());
    }

    #[test]
    fn system_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_scenario("baseline");
        log_system_event(
            Some(&ctx),
            "daemon.start",
            "simulation loop started",
            SystemEventOutcome::Success,
        );
        log_system_event(
            None,
            "scenario.load",
            "scenario file missing",
            SystemEventOutcome::Fault,
        );
        assert_eq!(SystemEventOutcome::Warning.as_str(), "warning");
    }
}
