//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "binary"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Headless simulation runs from the command line."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use stormwall_common::config::AppConfig;
use stormwall_sim::{
    ControlInputs, CumulativeStats, Engine, ScenarioPlayer, ServerStatus, TickMetrics,
};

use crate::format::format_rate;
use crate::{AttackTypeArg, OutputFormat, TierArg};

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Number of ticks to simulate.
    #[arg(long, value_name = "N", default_value_t = 600)]
    ticks: u64,

    /// Enable the attack stream.
    #[arg(long)]
    attack: bool,

    /// Attack intensity; values outside 1..=100 are clamped.
    #[arg(
        long = "attack-intensity",
        value_name = "LEVEL",
        default_value_t = 50,
        allow_negative_numbers = true
    )]
    attack_intensity: i32,

    #[arg(long = "attack-type", value_enum, default_value_t = AttackTypeArg::Volumetric)]
    attack_type: AttackTypeArg,

    /// Disable legitimate traffic.
    #[arg(long = "no-legit")]
    no_legit: bool,

    /// Legitimate traffic intensity; values outside 1..=100 are clamped.
    #[arg(
        long = "legit-intensity",
        value_name = "LEVEL",
        default_value_t = 30,
        allow_negative_numbers = true
    )]
    legit_intensity: i32,

    /// Engage request filtering.
    #[arg(long)]
    mitigation: bool,

    #[arg(long, value_enum, default_value_t = TierArg::Off)]
    tier: TierArg,

    /// JSON or CSV scenario replayed on top of the flags.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Configuration file supplying tick rate and capacity table.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a progress line every N ticks (text output only).
    #[arg(long, value_name = "N")]
    every: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ticks: u64,
    pub controls: ControlInputs,
    pub last: Option<TickMetrics>,
    pub stats: CumulativeStats,
    pub min_health: f64,
    pub max_latency_ms: f64,
    pub status_changes: u32,
    pub first_offline_tick: Option<u64>,
}

impl RunCommand {
    fn controls(&self) -> ControlInputs {
        ControlInputs {
            attack_enabled: self.attack,
            attack_intensity: self.attack_intensity,
            attack_type: self.attack_type.into(),
            legit_enabled: !self.no_legit,
            legit_intensity: self.legit_intensity,
            mitigation_enabled: self.mitigation,
            capacity_tier: self.tier.into(),
        }
    }

    pub fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => AppConfig::from_path(path)?,
            None => AppConfig::default(),
        };
        let scenario = self
            .scenario
            .as_deref()
            .map(ScenarioPlayer::from_path)
            .transpose()
            .context("failed to load scenario")?;
        let engine = Engine::new(config.engine_settings(), self.controls())?;

        let every = match self.format {
            OutputFormat::Text => self.every.filter(|n| *n > 0),
            OutputFormat::Json => None,
        };
        let report = simulate(engine, scenario, self.ticks, |tick| {
            if let Some(n) = every {
                if tick.tick % n == 0 {
                    println!("{}", progress_line(tick));
                }
            }
        })?;

        match self.format {
            OutputFormat::Text => print!("{}", render_text(&report)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}

/// Tick `engine` `ticks` times, replaying `scenario` if present.
pub fn simulate<F>(
    mut engine: Engine,
    mut scenario: Option<ScenarioPlayer>,
    ticks: u64,
    mut on_tick: F,
) -> Result<RunReport>
where
    F: FnMut(&TickMetrics),
{
    let mut last: Option<TickMetrics> = None;
    let mut min_health = engine.state().health;
    let mut max_latency_ms = engine.state().latency_ms;
    let mut status_changes = 0;
    let mut first_offline_tick = None;

    for _ in 0..ticks {
        if let Some(player) = scenario.as_mut() {
            player.apply_due(&mut engine)?;
        }
        let tick = engine.tick();
        min_health = min_health.min(tick.health);
        max_latency_ms = max_latency_ms.max(tick.latency_ms);
        if last.is_some_and(|previous| previous.status != tick.status) {
            status_changes += 1;
        }
        if tick.status == ServerStatus::Offline && first_offline_tick.is_none() {
            first_offline_tick = Some(tick.tick);
        }
        on_tick(&tick);
        last = Some(tick);
    }

    Ok(RunReport {
        ticks: engine.ticks(),
        controls: engine.controls(),
        last,
        stats: engine.snapshot_stats(),
        min_health,
        max_latency_ms,
        status_changes,
        first_offline_tick,
    })
}

fn progress_line(tick: &TickMetrics) -> String {
    format!(
        "tick {:>6}  {:<8}  health {:>5.1}%  latency {:>6.0}ms  load {:>6.0}%  rps {}",
        tick.tick,
        tick.status.as_str(),
        tick.health,
        tick.latency_ms,
        tick.load_percent,
        format_rate(tick.current_rps as f64)
    )
}

fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let controls = &report.controls;
    out.push_str(&format!(
        "controls  attack {} ({} @ {})  legit {} @ {}  mitigation {}  tier {} ({})\n",
        on_off(controls.attack_enabled),
        controls.attack_type,
        controls.attack_intensity,
        on_off(controls.legit_enabled),
        controls.legit_intensity,
        on_off(controls.mitigation_enabled),
        controls.capacity_tier,
        controls.capacity_tier.label()
    ));
    match &report.last {
        Some(tick) => {
            out.push_str(&format!(
                "status    {} after {} ticks  health {:.1}%  latency {:.0}ms  load {:.0}%\n",
                tick.status, report.ticks, tick.health, tick.latency_ms, tick.load_percent
            ));
            out.push_str(&format!(
                "traffic   total {} rps  legit {} rps  attack {} rps  waf {}%\n",
                format_rate(tick.current_rps as f64),
                format_rate(tick.current_legit_rps as f64),
                format_rate(tick.current_attack_rps as f64),
                tick.waf_integrity_percent
            ));
        }
        None => out.push_str("status    no ticks simulated\n"),
    }
    let stats = &report.stats;
    out.push_str(&format!(
        "requests  total {}  blocked {}  served {}  dropped {} ({:.1}%)\n",
        format_rate(stats.total_requests as f64),
        format_rate(stats.blocked_requests as f64),
        format_rate(stats.successful_legitimate as f64),
        format_rate(stats.dropped_legitimate as f64),
        stats.legit_drop_percent()
    ));
    out.push_str(&format!(
        "extremes  min health {:.1}%  max latency {:.0}ms  status changes {}",
        report.min_health, report.max_latency_ms, report.status_changes
    ));
    if let Some(tick) = report.first_offline_tick {
        out.push_str(&format!("  offline at tick {tick}"));
    }
    out.push('\n');
    out
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwall_sim::{AttackType, CapacityTier, EngineSettings, ScenarioStep};

    #[test]
    fn flood_report_tracks_first_offline_tick() {
        let controls = ControlInputs {
            attack_enabled: true,
            attack_intensity: 100,
            ..ControlInputs::default()
        };
        let engine = Engine::new(EngineSettings::default(), controls).unwrap();
        let mut seen = 0;
        let report = simulate(engine, None, 300, |_| seen += 1).unwrap();
        assert_eq!(seen, 300);
        assert_eq!(report.ticks, 300);
        let offline = report.first_offline_tick.unwrap();
        assert!(offline > 1 && offline < 300);
        assert_eq!(report.last.unwrap().status, ServerStatus::Offline);
        assert!(report.status_changes >= 2);
        assert!(report.min_health < 5.0);
    }

    #[test]
    fn scenario_overrides_flags() {
        let scenario = ScenarioPlayer::new(vec![ScenarioStep {
            at_tick: 0,
            capacity_tier: Some(CapacityTier::Ultra),
            attack_type: Some(AttackType::Application),
            ..Default::default()
        }]);
        let report = simulate(Engine::with_defaults(), Some(scenario), 10, |_| {}).unwrap();
        assert_eq!(report.controls.capacity_tier, CapacityTier::Ultra);
        assert_eq!(report.controls.attack_type, AttackType::Application);
        assert_eq!(report.last.unwrap().status, ServerStatus::Online);
    }

    #[test]
    fn text_report_mentions_status_and_rates() {
        let report = simulate(Engine::with_defaults(), None, 60, |_| {}).unwrap();
        let text = render_text(&report);
        assert!(text.contains("status    ONLINE after 60 ticks"));
        assert!(text.contains("legit 9k rps"));
        assert!(text.contains("tier off (Single VPS)"));
    }

    #[test]
    fn zero_ticks_produce_empty_report() {
        let report = simulate(Engine::with_defaults(), None, 0, |_| {}).unwrap();
        assert!(report.last.is_none());
        assert!(render_text(&report).contains("no ticks simulated"));
    }
}
