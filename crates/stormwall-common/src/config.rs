//! ---
//! sw_section: "01-core-functionality"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Configuration model and loading for Stormwall hosts."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use stormwall_sim::{CapacityTable, ControlInputs, EngineSettings, DEFAULT_TICK_RATE_HZ};
use tracing::debug;

use crate::logging::LogFormat;

/// Upper bound for the tick rate; beyond this the host cannot keep up anyway.
pub const MAX_TICK_RATE_HZ: f64 = 1_000.0;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_metrics_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9899))
}

fn default_tick_rate() -> f64 {
    DEFAULT_TICK_RATE_HZ
}

fn default_status_log_interval() -> u64 {
    60
}

/// Primary configuration object for Stormwall hosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Controls applied before the first tick.
    #[serde(default)]
    pub controls: ControlInputs,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and defaults are in effect.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "STORMWALL_CONFIG";

    /// Load configuration from the first existing candidate, respecting the
    /// `STORMWALL_CONFIG` override. Errors when nothing can be found.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        let loaded = Self::load_with_source(candidates)?;
        if loaded.source.is_none() {
            return Err(anyhow!(
                "no configuration files found. inspected: {}",
                candidates
                    .iter()
                    .map(|p| p.as_ref().display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        Ok(loaded.config)
    }

    /// Load configuration together with the effective source path, falling
    /// back to defaults when no candidate exists.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        Self::load_with_override(std::env::var(Self::ENV_CONFIG_PATH).ok(), candidates)
    }

    fn load_with_override<P: AsRef<Path>>(
        override_path: Option<String>,
        candidates: &[P],
    ) -> Result<LoadedAppConfig> {
        if let Some(env_path) = override_path {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found; using defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        Ok(())
    }

    /// Engine parameters derived from the simulation section.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            capacities: self.simulation.capacity,
            tick_rate_hz: self.simulation.tick_rate_hz,
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_listen")]
    pub listen: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: default_metrics_listen(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
    /// Convert rates to counts with measured frame time instead of `1 / tick_rate_hz`.
    #[serde(default)]
    pub elapsed_time_stats: bool,
    #[serde(default, rename = "run_for_secs")]
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub run_for: Option<Duration>,
    #[serde(default = "default_status_log_interval")]
    pub status_log_interval_ticks: u64,
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    #[serde(default)]
    pub capacity: CapacityTable,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            elapsed_time_stats: false,
            run_for: None,
            status_log_interval_ticks: default_status_log_interval(),
            scenario: None,
            capacity: CapacityTable::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_rate_hz.is_finite()
            && self.tick_rate_hz > 0.0
            && self.tick_rate_hz <= MAX_TICK_RATE_HZ)
        {
            return Err(anyhow!(
                "simulation.tick_rate_hz must be in (0, {}] (got {})",
                MAX_TICK_RATE_HZ,
                self.tick_rate_hz
            ));
        }
        if self.status_log_interval_ticks == 0 {
            return Err(anyhow!(
                "simulation.status_log_interval_ticks must be at least 1"
            ));
        }
        self.capacity
            .validate()
            .context("invalid simulation.capacity table")?;
        Ok(())
    }

    /// Nominal duration of one tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }
}
