//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "binary"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Control CLI for running and inspecting the simulation."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use stormwall_logging as logging;
use stormwall_sim::{AttackType, CapacityTier};

mod format;
mod inspect;
mod run;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Stormwall load simulation utility",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the simulation headless for a fixed number of ticks")]
    Run(run::RunCommand),
    #[command(about = "Show the attack rate curve for a set of intensities")]
    Traffic(inspect::TrafficCommand),
    #[command(about = "List capacity tiers")]
    Tiers(inspect::TiersCommand),
    #[command(name = "check-config", about = "Load and validate a configuration file")]
    CheckConfig(inspect::CheckConfigCommand),
}

/// Output rendering shared by the subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttackTypeArg {
    #[value(alias = "l3", alias = "l4")]
    Volumetric,
    #[value(alias = "l7")]
    Application,
}

impl From<AttackTypeArg> for AttackType {
    fn from(value: AttackTypeArg) -> Self {
        match value {
            AttackTypeArg::Volumetric => AttackType::Volumetric,
            AttackTypeArg::Application => AttackType::Application,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    #[value(alias = "vps")]
    Off,
    #[value(alias = "cluster")]
    Standard,
    #[value(alias = "edge")]
    Ultra,
}

impl From<TierArg> for CapacityTier {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Off => CapacityTier::Off,
            TierArg::Standard => CapacityTier::Standard,
            TierArg::Ultra => CapacityTier::Ultra,
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(cmd) => cmd.execute()?,
        Commands::Traffic(cmd) => cmd.execute()?,
        Commands::Tiers(cmd) => cmd.execute()?,
        Commands::CheckConfig(cmd) => cmd.execute()?,
    }
    Ok(())
}
