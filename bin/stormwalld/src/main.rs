//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "binary"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Binary entrypoint for the Stormwall simulation daemon."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use stormwall_common::config::AppConfig;
use stormwall_common::logging::init_tracing;
use stormwall_common::time::{duration_to_micros, simulated_time, ticks_in};
use stormwall_logging::{log_system_event, LogContext, SystemEventOutcome};
use stormwall_metrics::{new_registry, spawn_http_server, SimulationMetrics};
use stormwall_rt::TickScheduler;
use stormwall_sim::{Engine, ScenarioPlayer};
use tokio::signal;
use tracing::info;

mod runner;

use runner::SimulationRunner;

#[derive(Debug, Parser)]
#[command(author, version, about = "Stormwall load simulation daemon", long_about = None)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "HZ", help = "Override simulation.tick_rate_hz")]
    tick_rate: Option<f64>,

    #[arg(long, value_name = "FILE", help = "Replay a JSON or CSV scenario")]
    scenario: Option<PathBuf>,

    #[arg(long, value_name = "SECS", help = "Stop after this many seconds")]
    duration: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::load_with_source(&[PathBuf::from("configs/stormwall.toml")])?.config,
    };
    if let Some(rate) = cli.tick_rate {
        config.simulation.tick_rate_hz = rate;
    }
    if let Some(path) = cli.scenario {
        config.simulation.scenario = Some(path);
    }
    if let Some(secs) = cli.duration {
        config.simulation.run_for = Some(Duration::from_secs(secs));
    }
    config
        .validate()
        .context("configuration rejected after command-line overrides")?;

    init_tracing("stormwalld", &config.logging)?;

    let registry = new_registry();
    let metrics = SimulationMetrics::new(registry.clone())?;
    let exporter = if config.metrics.enabled {
        Some(spawn_http_server(registry, config.metrics.listen).await?)
    } else {
        info!("metrics exporter disabled by configuration");
        None
    };

    let scenario = match &config.simulation.scenario {
        Some(path) => {
            let player = ScenarioPlayer::from_path(path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?;
            info!(path = %path.display(), steps = player.steps().len(), "scenario loaded");
            Some(player)
        }
        None => None,
    };

    let engine = Engine::new(config.engine_settings(), config.controls)?;
    let tick_rate = config.simulation.tick_rate_hz;
    let limit = config
        .simulation
        .run_for
        .map(|duration| ticks_in(duration, tick_rate));
    let mut scheduler = TickScheduler::from_rate(tick_rate)?.with_limit(limit);
    info!(
        period_us = duration_to_micros(scheduler.period()),
        limit = ?limit,
        "tick scheduler ready"
    );
    let mut runner = SimulationRunner::new(
        engine,
        scenario,
        metrics,
        scheduler.period(),
        config.simulation.elapsed_time_stats,
        config.simulation.status_log_interval_ticks,
    );

    log_system_event(
        Some(&LogContext::new().with_tier(config.controls.capacity_tier.as_str())),
        "daemon.start",
        &format!("simulation running at {tick_rate} Hz"),
        SystemEventOutcome::Success,
    );

    let outcome = tokio::select! {
        result = drive(&mut scheduler, &mut runner) => result,
        interrupted = signal::ctrl_c() => {
            info!("ctrl-c received; shutting down");
            interrupted.context("failed to listen for ctrl-c")
        }
    };

    runner.finish();
    info!(
        simulated_secs = simulated_time(runner.engine().ticks(), tick_rate).as_secs_f64(),
        "simulated time"
    );
    if let Some(server) = exporter {
        server.shutdown().await?;
    }

    let event_outcome = if outcome.is_ok() {
        SystemEventOutcome::Success
    } else {
        SystemEventOutcome::Fault
    };
    log_system_event(None, "daemon.stop", "simulation stopped", event_outcome);
    outcome
}

async fn drive(scheduler: &mut TickScheduler, runner: &mut SimulationRunner) -> Result<()> {
    while let Some(frame) = scheduler.next().await {
        runner.step(frame.elapsed)?;
    }
    info!(ticks = scheduler.ticks_emitted(), "configured duration reached");
    Ok(())
}
