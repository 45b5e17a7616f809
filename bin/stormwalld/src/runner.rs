//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "binary"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Per-frame driver tying engine, scenario and telemetry together."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use stormwall_common::FrameClock;
use stormwall_logging::{sw_info, sw_warn, LogContext};
use stormwall_metrics::SimulationMetrics;
use stormwall_sim::{Engine, ScenarioPlayer, ServerStatus, TickMetrics};
use tracing::info;

/// Remembers the previous status so transitions can be reported once.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<ServerStatus>,
}

impl StatusTracker {
    /// Returns the previous status when `status` differs from it.
    pub fn observe(&mut self, status: ServerStatus) -> Option<Option<ServerStatus>> {
        let previous = self.last.replace(status);
        (previous != Some(status)).then_some(previous)
    }
}

pub struct SimulationRunner {
    engine: Engine,
    scenario: Option<ScenarioPlayer>,
    scenario_name: String,
    metrics: SimulationMetrics,
    tracker: StatusTracker,
    clock: FrameClock,
    elapsed_time_stats: bool,
    summary_interval: u64,
}

impl SimulationRunner {
    pub fn new(
        engine: Engine,
        scenario: Option<ScenarioPlayer>,
        metrics: SimulationMetrics,
        target_interval: Duration,
        elapsed_time_stats: bool,
        summary_interval: u64,
    ) -> Self {
        let scenario_name = scenario
            .as_ref()
            .and_then(|player| player.source())
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "interactive".to_owned());
        Self {
            engine,
            scenario,
            scenario_name,
            metrics,
            tracker: StatusTracker::default(),
            clock: FrameClock::new(target_interval),
            elapsed_time_stats,
            summary_interval: summary_interval.max(1),
        }
    }

    /// Advance the simulation by one frame that took `frame_time` of wall-clock time.
    pub fn step(&mut self, frame_time: Duration) -> Result<TickMetrics> {
        let frame_time = self.clock.observe(frame_time);
        self.apply_scenario()?;

        let started = Instant::now();
        let tick = if self.elapsed_time_stats {
            self.engine.tick_elapsed(frame_time)
        } else {
            self.engine.tick()
        };
        self.metrics.observe_tick_duration(started.elapsed());

        let stats = self.engine.snapshot_stats();
        self.metrics.observe(&tick, &stats);

        let tier = self.engine.controls().capacity_tier;
        let ctx = LogContext::new()
            .with_scenario(&self.scenario_name)
            .with_tick(tick.tick)
            .with_status(tick.status.as_str())
            .with_tier(tier.as_str());

        if let Some(previous) = self.tracker.observe(tick.status) {
            self.metrics.record_status_transition(tick.status);
            let from = previous.map(|status| status.as_str()).unwrap_or("none");
            match tick.status {
                ServerStatus::Online => sw_info!(
                    context = ctx,
                    "server status {} -> {} (health {:.1}%, latency {:.0}ms)",
                    from,
                    tick.status,
                    tick.health,
                    tick.latency_ms
                ),
                _ => sw_warn!(
                    context = ctx,
                    "server status {} -> {} (health {:.1}%, latency {:.0}ms)",
                    from,
                    tick.status,
                    tick.health,
                    tick.latency_ms
                ),
            }
        }

        if tick.tick % self.summary_interval == 0 {
            sw_info!(
                context = ctx,
                "load {:.0}% rps {} (legit {}, attack {}) waf {}% served {} dropped {}",
                tick.load_percent,
                tick.current_rps,
                tick.current_legit_rps,
                tick.current_attack_rps,
                tick.waf_integrity_percent,
                stats.successful_legitimate,
                stats.dropped_legitimate
            );
        }
        Ok(tick)
    }

    fn apply_scenario(&mut self) -> Result<()> {
        let Some(player) = self.scenario.as_mut() else {
            return Ok(());
        };
        let tick = self.engine.ticks();
        let applied = player
            .apply_due(&mut self.engine)
            .with_context(|| format!("failed to apply scenario step at tick {tick}"))?;
        for step in applied {
            let ctx = LogContext::new()
                .with_scenario(&self.scenario_name)
                .with_tick(tick);
            sw_info!(context = ctx, "scenario step '{}' applied", step.display_label());
        }
        Ok(())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Log the final counters and frame jitter.
    pub fn finish(&self) {
        let stats = self.engine.snapshot_stats();
        info!(
            ticks = self.engine.ticks(),
            total_requests = stats.total_requests,
            blocked_requests = stats.blocked_requests,
            dropped_legitimate = stats.dropped_legitimate,
            successful_legitimate = stats.successful_legitimate,
            legit_drop_percent = stats.legit_drop_percent(),
            "simulation finished"
        );
        if let Some(jitter) = self.clock.histogram().summary() {
            info!(
                mean_us = jitter.mean_us,
                std_dev_us = jitter.std_dev_us,
                max_us = jitter.max_us,
                samples = jitter.samples,
                "frame jitter"
            );
        }
    }
}
