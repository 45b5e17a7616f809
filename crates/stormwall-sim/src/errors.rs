//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Error types surfaced by the simulation engine."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::path::PathBuf;

use thiserror::Error;

use crate::controls::CapacityTier;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("capacity for tier '{tier}' must be positive and finite (got {value})")]
    InvalidCapacity { tier: CapacityTier, value: f64 },
    #[error("tick rate must be positive and finite (got {0} Hz)")]
    InvalidTickRate(f64),
    #[error("unsupported scenario format: {0}")]
    ScenarioFormat(PathBuf),
    #[error("unable to read scenario {path}: {source}")]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario step {index} in {path}: {reason}")]
    ScenarioParse {
        path: PathBuf,
        index: usize,
        reason: String,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
