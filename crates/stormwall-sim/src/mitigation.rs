//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Filtering layer (WAF / scrubbing) model."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use crate::controls::AttackType;

/// Efficiency floor of the filtering layer under any saturation.
pub const MIN_EFFICIENCY: f64 = 0.5;
/// Attack-to-capacity ratio above which filtering starts to degrade.
pub const SATURATION_KNEE: f64 = 5.0;
/// Efficiency lost per unit of saturation beyond the knee.
pub const SATURATION_PENALTY_PER_UNIT: f64 = 0.02;

/// Filtering efficiency against an unsaturated attack of the given type.
pub fn base_efficiency(attack_type: AttackType) -> f64 {
    match attack_type {
        AttackType::Volumetric => 0.99,
        AttackType::Application => 0.90,
    }
}

/// Efficiency after accounting for saturation of the filtering layer.
pub fn effective_efficiency(attack_type: AttackType, attack_rps: f64, capacity: f64) -> f64 {
    let saturation = attack_rps / capacity;
    let penalty = ((saturation - SATURATION_KNEE) * SATURATION_PENALTY_PER_UNIT).max(0.0);
    (base_efficiency(attack_type) - penalty).max(MIN_EFFICIENCY)
}

/// Split of attack traffic between the filter and the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MitigationOutcome {
    pub active: bool,
    pub efficiency: f64,
    pub blocked_rps: f64,
    pub allowed_rps: f64,
}

impl MitigationOutcome {
    /// Outcome when no filtering layer is engaged.
    pub fn passthrough(attack_rps: f64) -> Self {
        Self {
            active: false,
            efficiency: 1.0,
            blocked_rps: 0.0,
            allowed_rps: attack_rps,
        }
    }

    /// Integrity shown to operators, floored to whole percent.
    pub fn integrity_percent(&self) -> u32 {
        (self.efficiency * 100.0).floor() as u32
    }
}

/// Apply the filtering layer to the attack share of the offered traffic.
pub fn mitigate(
    enabled: bool,
    attack_type: AttackType,
    attack_rps: f64,
    capacity: f64,
) -> MitigationOutcome {
    if !enabled {
        return MitigationOutcome::passthrough(attack_rps);
    }
    let efficiency = effective_efficiency(attack_type, attack_rps, capacity);
    let blocked_rps = attack_rps * efficiency;
    MitigationOutcome {
        active: true,
        efficiency,
        blocked_rps,
        allowed_rps: attack_rps - blocked_rps,
    }
}
