//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Operator control inputs and capacity tiers."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, SimError};

/// Lowest accepted slider position.
pub const MIN_INTENSITY: i32 = 1;
/// Highest accepted slider position.
pub const MAX_INTENSITY: i32 = 100;

/// Clamp a raw slider value into `[MIN_INTENSITY, MAX_INTENSITY]`.
pub fn clamp_intensity(raw: i32) -> i32 {
    raw.clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// Attack vector selected by the operator.
///
/// Parsing is lenient: anything that is not recognisably an application-layer
/// attack falls back to [`AttackType::Volumetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AttackType {
    /// L3/L4 floods (UDP, SYN); cheap to signature and rate-limit.
    #[default]
    Volumetric,
    /// L7 request floods that mimic legitimate clients.
    Application,
}

impl AttackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackType::Volumetric => "volumetric",
            AttackType::Application => "application",
        }
    }

    /// Resolve a free-form label, returning `None` when it is not recognised.
    pub fn recognise(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "volumetric" | "l3" | "l4" | "l3/l4" | "l3/l4 volumetric" | "udp" | "syn" => {
                Some(AttackType::Volumetric)
            }
            "application" | "app" | "l7" | "l7 application" | "http" => {
                Some(AttackType::Application)
            }
            _ => None,
        }
    }

    /// Resolve a label, defaulting unknown values to volumetric.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::recognise(raw).unwrap_or_else(|| {
            warn!(target: "stormwall::sim::controls", value = raw, "unknown attack type; using volumetric");
            Self::default()
        })
    }
}

impl From<&str> for AttackType {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl From<String> for AttackType {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provisioned infrastructure tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum CapacityTier {
    /// Single optimised web server.
    #[default]
    Off,
    /// Load-balanced cluster.
    Standard,
    /// Global anycast edge network.
    Ultra,
}

impl CapacityTier {
    pub const ALL: [CapacityTier; 3] = [CapacityTier::Off, CapacityTier::Standard, CapacityTier::Ultra];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityTier::Off => "off",
            CapacityTier::Standard => "standard",
            CapacityTier::Ultra => "ultra",
        }
    }

    /// Operator-facing name of the infrastructure behind the tier.
    pub fn label(&self) -> &'static str {
        match self {
            CapacityTier::Off => "Single VPS",
            CapacityTier::Standard => "Cluster",
            CapacityTier::Ultra => "Edge Net",
        }
    }

    pub fn recognise(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "vps" | "single" | "single-vps" | "single vps" => {
                Some(CapacityTier::Off)
            }
            "standard" | "cluster" => Some(CapacityTier::Standard),
            "ultra" | "edge" | "edge-net" | "edge net" => Some(CapacityTier::Ultra),
            _ => None,
        }
    }

    /// Resolve a label, defaulting unknown values to the smallest tier.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::recognise(raw).unwrap_or_else(|| {
            warn!(target: "stormwall::sim::controls", value = raw, "unknown capacity tier; using off");
            Self::default()
        })
    }
}

impl From<&str> for CapacityTier {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl From<String> for CapacityTier {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for CapacityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_off_capacity() -> f64 {
    50_000.0
}

fn default_standard_capacity() -> f64 {
    500_000.0
}

fn default_ultra_capacity() -> f64 {
    10_000_000.0
}

/// Sustainable requests per second for each tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityTable {
    #[serde(default = "default_off_capacity")]
    pub off: f64,
    #[serde(default = "default_standard_capacity")]
    pub standard: f64,
    #[serde(default = "default_ultra_capacity")]
    pub ultra: f64,
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self {
            off: default_off_capacity(),
            standard: default_standard_capacity(),
            ultra: default_ultra_capacity(),
        }
    }
}

impl CapacityTable {
    pub fn capacity(&self, tier: CapacityTier) -> f64 {
        match tier {
            CapacityTier::Off => self.off,
            CapacityTier::Standard => self.standard,
            CapacityTier::Ultra => self.ultra,
        }
    }

    /// Resolve the capacity for `tier`, rejecting zero, negative or non-finite entries.
    pub fn checked_capacity(&self, tier: CapacityTier) -> Result<f64> {
        let value = self.capacity(tier);
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(SimError::InvalidCapacity { tier, value })
        }
    }

    pub fn validate(&self) -> Result<()> {
        for tier in CapacityTier::ALL {
            self.checked_capacity(tier)?;
        }
        Ok(())
    }
}

fn default_attack_intensity() -> i32 {
    50
}

fn default_legit_intensity() -> i32 {
    30
}

fn default_true() -> bool {
    true
}

/// Operator controls read by the engine on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInputs {
    #[serde(default)]
    pub attack_enabled: bool,
    #[serde(default = "default_attack_intensity")]
    pub attack_intensity: i32,
    #[serde(default)]
    pub attack_type: AttackType,
    #[serde(default = "default_true")]
    pub legit_enabled: bool,
    #[serde(default = "default_legit_intensity")]
    pub legit_intensity: i32,
    #[serde(default)]
    pub mitigation_enabled: bool,
    #[serde(default)]
    pub capacity_tier: CapacityTier,
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self {
            attack_enabled: false,
            attack_intensity: default_attack_intensity(),
            attack_type: AttackType::default(),
            legit_enabled: true,
            legit_intensity: default_legit_intensity(),
            mitigation_enabled: false,
            capacity_tier: CapacityTier::default(),
        }
    }
}

impl ControlInputs {
    /// Copy of the inputs with both intensities forced into range.
    pub fn clamped(mut self) -> Self {
        self.attack_intensity = clamp_intensity(self.attack_intensity);
        self.legit_intensity = clamp_intensity(self.legit_intensity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensities_are_clamped_not_rejected() {
        let inputs = ControlInputs {
            attack_intensity: 250,
            legit_intensity: -4,
            ..Default::default()
        }
        .clamped();
        assert_eq!(inputs.attack_intensity, 100);
        assert_eq!(inputs.legit_intensity, 1);
    }

    #[test]
    fn unknown_labels_fall_back_to_conservative_defaults() {
        assert_eq!(AttackType::parse_lenient("smurf"), AttackType::Volumetric);
        assert_eq!(AttackType::parse_lenient(" L7 "), AttackType::Application);
        assert_eq!(CapacityTier::parse_lenient("mega"), CapacityTier::Off);
        assert_eq!(CapacityTier::parse_lenient("Cluster"), CapacityTier::Standard);
        assert_eq!(AttackType::from("L7 APPLICATION"), AttackType::Application);
        assert_eq!(CapacityTier::from("Edge Net"), CapacityTier::Ultra);
        assert_eq!(CapacityTier::from("Single VPS"), CapacityTier::Off);
    }

    #[test]
    fn deserializes_leniently_from_json() {
        let inputs: ControlInputs = serde_json::from_str(
            r#"{"attack_enabled":true,"attack_type":"bogus","capacity_tier":"ultra"}"#,
        )
        .unwrap();
        assert!(inputs.attack_enabled);
        assert_eq!(inputs.attack_type, AttackType::Volumetric);
        assert_eq!(inputs.capacity_tier, CapacityTier::Ultra);
        assert_eq!(inputs.attack_intensity, 50);
        assert!(inputs.legit_enabled);
    }

    #[test]
    fn capacity_table_rejects_zero_entries() {
        let table = CapacityTable {
            standard: 0.0,
            ..Default::default()
        };
        assert!(table.checked_capacity(CapacityTier::Off).is_ok());
        assert!(matches!(
            table.validate(),
            Err(SimError::InvalidCapacity {
                tier: CapacityTier::Standard,
                ..
            })
        ));
    }
}
