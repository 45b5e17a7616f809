//! ---
//! sw_section: "04-observability"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Gauges and counters mirroring simulation telemetry."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use prometheus::{
    Gauge, Histogram, HistogramOpts, IntCounterVec, IntGauge, IntGaugeVec, Opts,
};
use stormwall_sim::{CumulativeStats, ServerStatus, TickMetrics};

use crate::SharedRegistry;

const REQUEST_KINDS: [&str; 4] = ["total", "blocked", "dropped_legitimate", "successful_legitimate"];

/// Prometheus view of a running simulation.
#[derive(Clone)]
pub struct SimulationMetrics {
    registry: SharedRegistry,
    health: Gauge,
    latency_ms: Gauge,
    load_percent: Gauge,
    waf_integrity: IntGauge,
    mitigation_active: IntGauge,
    rps: IntGaugeVec,
    requests: IntCounterVec,
    status_transitions: IntCounterVec,
    tick_seconds: Histogram,
    ticks: IntGauge,
}

impl fmt::Debug for SimulationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationMetrics")
            .field("health", &self.health.get())
            .field("latency_ms", &self.latency_ms.get())
            .field("ticks", &self.ticks.get())
            .finish()
    }
}

impl SimulationMetrics {
    pub fn new(registry: SharedRegistry) -> Result<Self> {
        let health = Gauge::with_opts(Opts::new(
            "stormwall_server_health",
            "Smoothed server availability in percent",
        ))?;
        registry.register(Box::new(health.clone()))?;

        let latency_ms = Gauge::with_opts(Opts::new(
            "stormwall_latency_ms",
            "Smoothed response latency in milliseconds",
        ))?;
        registry.register(Box::new(latency_ms.clone()))?;

        let load_percent = Gauge::with_opts(Opts::new(
            "stormwall_load_percent",
            "Weighted demand as a percentage of capacity",
        ))?;
        registry.register(Box::new(load_percent.clone()))?;

        let waf_integrity = IntGauge::with_opts(Opts::new(
            "stormwall_waf_integrity_percent",
            "Filtering efficiency in percent, 100 when filtering is off",
        ))?;
        registry.register(Box::new(waf_integrity.clone()))?;

        let mitigation_active = IntGauge::with_opts(Opts::new(
            "stormwall_mitigation_active",
            "Indicator (0/1) whether filtering is engaged",
        ))?;
        registry.register(Box::new(mitigation_active.clone()))?;

        let rps = IntGaugeVec::new(
            Opts::new("stormwall_requests_per_second", "Offered request rate by class"),
            &["class"],
        )?;
        registry.register(Box::new(rps.clone()))?;

        let requests = IntCounterVec::new(
            Opts::new(
                "stormwall_requests_total",
                "Cumulative simulated requests by outcome",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        let status_transitions = IntCounterVec::new(
            Opts::new(
                "stormwall_status_transitions_total",
                "Number of times the server entered each status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(status_transitions.clone()))?;

        let buckets = prometheus::exponential_buckets(0.000_001, 4.0, 12)
            .context("failed to construct tick histogram buckets")?;
        let tick_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "stormwall_tick_duration_seconds",
                "Wall-clock time spent computing one tick",
            )
            .buckets(buckets),
        )?;
        registry.register(Box::new(tick_seconds.clone()))?;

        let ticks = IntGauge::with_opts(Opts::new(
            "stormwall_ticks",
            "Ticks processed since start",
        ))?;
        registry.register(Box::new(ticks.clone()))?;

        Ok(Self {
            registry,
            health,
            latency_ms,
            load_percent,
            waf_integrity,
            mitigation_active,
            rps,
            requests,
            status_transitions,
            tick_seconds,
            ticks,
        })
    }

    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// Publish one tick's telemetry together with the running totals.
    pub fn observe(&self, tick: &TickMetrics, stats: &CumulativeStats) {
        self.health.set(tick.health);
        self.latency_ms.set(tick.latency_ms);
        self.load_percent.set(tick.load_percent);
        self.waf_integrity.set(i64::from(tick.waf_integrity_percent));
        self.mitigation_active
            .set(if tick.mitigation_active { 1 } else { 0 });
        self.ticks.set(saturating_i64(tick.tick));

        self.rps
            .with_label_values(&["legit"])
            .set(saturating_i64(tick.current_legit_rps));
        self.rps
            .with_label_values(&["attack"])
            .set(saturating_i64(tick.current_attack_rps));
        self.rps
            .with_label_values(&["total"])
            .set(saturating_i64(tick.current_rps));

        let totals = [
            stats.total_requests,
            stats.blocked_requests,
            stats.dropped_legitimate,
            stats.successful_legitimate,
        ];
        for (kind, total) in REQUEST_KINDS.into_iter().zip(totals) {
            let counter = self.requests.with_label_values(&[kind]);
            // Counters only move forward; the engine totals are monotonic.
            let delta = total.saturating_sub(counter.get());
            if delta > 0 {
                counter.inc_by(delta);
            }
        }
    }

    pub fn record_status_transition(&self, status: ServerStatus) {
        self.status_transitions
            .with_label_values(&[status.as_str()])
            .inc();
    }

    pub fn status_transitions(&self, status: ServerStatus) -> u64 {
        self.status_transitions
            .with_label_values(&[status.as_str()])
            .get()
    }

    pub fn observe_tick_duration(&self, elapsed: Duration) {
        self.tick_seconds.observe(elapsed.as_secs_f64());
    }

    pub fn requests(&self, kind: &str) -> u64 {
        self.requests.with_label_values(&[kind]).get()
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
