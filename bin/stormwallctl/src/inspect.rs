//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "binary"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Read-only inspection commands: traffic curve, tiers, config check."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use stormwall_common::config::AppConfig;
use stormwall_logging::{log_system_event, SystemEventOutcome};
use stormwall_sim::traffic::LEGIT_CAPACITY_SHARE;
use stormwall_sim::{attack_rps, clamp_intensity, CapacityTable, CapacityTier};

use crate::format::format_rate;
use crate::OutputFormat;

#[derive(Debug, Args)]
pub struct TrafficCommand {
    /// Comma-separated intensities to tabulate.
    #[arg(
        long = "intensity",
        value_name = "LIST",
        value_delimiter = ',',
        default_values_t = [1, 10, 25, 50, 75, 100],
        allow_negative_numbers = true
    )]
    intensities: Vec<i32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Serialize)]
struct TrafficRow {
    intensity: i32,
    attack_rps: f64,
    /// Attack rate as a multiple of each tier's capacity, in tier order.
    capacity_multiples: [f64; 3],
}

impl TrafficCommand {
    pub fn execute(self) -> Result<()> {
        let table = CapacityTable::default();
        let rows: Vec<TrafficRow> = self
            .intensities
            .iter()
            .map(|raw| {
                let intensity = clamp_intensity(*raw);
                let rate = attack_rps(intensity);
                TrafficRow {
                    intensity,
                    attack_rps: rate,
                    capacity_multiples: CapacityTier::ALL.map(|tier| rate / table.capacity(tier)),
                }
            })
            .collect();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            OutputFormat::Text => {
                println!(
                    "{:>9}  {:>12}  {:>7}  {:>7}  {:>7}",
                    "INTENSITY", "ATTACK RPS", "x OFF", "x STD", "x ULTRA"
                );
                for row in &rows {
                    let [off, standard, ultra] = row.capacity_multiples;
                    println!(
                        "{:>9}  {:>12}  {:>7.2}  {:>7.2}  {:>7.3}",
                        row.intensity,
                        format_rate(row.attack_rps),
                        off,
                        standard,
                        ultra
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TiersCommand {
    /// Read capacities from this configuration instead of the built-in table.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Serialize)]
struct TierRow {
    tier: CapacityTier,
    label: &'static str,
    capacity_rps: f64,
    max_legit_rps: f64,
}

impl TiersCommand {
    pub fn execute(self) -> Result<()> {
        let table = match &self.config {
            Some(path) => AppConfig::from_path(path)?.simulation.capacity,
            None => CapacityTable::default(),
        };
        let rows: Vec<TierRow> = CapacityTier::ALL
            .iter()
            .map(|tier| TierRow {
                tier: *tier,
                label: tier.label(),
                capacity_rps: table.capacity(*tier),
                max_legit_rps: table.capacity(*tier) * LEGIT_CAPACITY_SHARE,
            })
            .collect();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            OutputFormat::Text => {
                println!(
                    "{:<9}  {:<11}  {:>9}  {:>9}",
                    "TIER", "LABEL", "CAPACITY", "MAX LEGIT"
                );
                for row in &rows {
                    println!(
                        "{:<9}  {:<11}  {:>9}  {:>9}",
                        row.tier.as_str(),
                        row.label,
                        format_rate(row.capacity_rps),
                        format_rate(row.max_legit_rps)
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct CheckConfigCommand {
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
}

impl CheckConfigCommand {
    pub fn execute(self) -> Result<()> {
        let config = match AppConfig::from_path(&self.config) {
            Ok(config) => config,
            Err(err) => {
                log_system_event(
                    None,
                    "config.check",
                    &format!("{} rejected", self.config.display()),
                    SystemEventOutcome::Fault,
                );
                return Err(err);
            }
        };
        let simulation = &config.simulation;
        println!("configuration OK: {}", self.config.display());
        println!("  tick rate        {} Hz", simulation.tick_rate_hz);
        println!(
            "  capacities       off {} / standard {} / ultra {}",
            format_rate(simulation.capacity.off),
            format_rate(simulation.capacity.standard),
            format_rate(simulation.capacity.ultra)
        );
        println!(
            "  elapsed stats    {}",
            if simulation.elapsed_time_stats { "on" } else { "off" }
        );
        match simulation.run_for {
            Some(duration) => println!("  run for          {}s", duration.as_secs()),
            None => println!("  run for          until interrupted"),
        }
        if let Some(scenario) = &simulation.scenario {
            println!("  scenario         {}", scenario.display());
        }
        println!(
            "  metrics          {}",
            if config.metrics.enabled {
                config.metrics.listen.to_string()
            } else {
                "disabled".to_owned()
            }
        );
        log_system_event(
            None,
            "config.check",
            &format!("{} accepted", self.config.display()),
            SystemEventOutcome::Success,
        );
        Ok(())
    }
}
