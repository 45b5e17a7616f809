//! ---
//! sw_section: "02-simulation-core"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Scripted control timelines replayed against the engine."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controls::{AttackType, CapacityTier, ControlInputs};
use crate::engine::Engine;
use crate::errors::{Result, SimError};

/// A control change scheduled for a given tick. Unset fields keep their value.
///
/// Unknown keys are rejected so a misspelled control cannot silently turn a
/// step into a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioStep {
    pub at_tick: u64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub attack_enabled: Option<bool>,
    #[serde(default)]
    pub attack_intensity: Option<i32>,
    #[serde(default)]
    pub attack_type: Option<AttackType>,
    #[serde(default)]
    pub legit_enabled: Option<bool>,
    #[serde(default)]
    pub legit_intensity: Option<i32>,
    #[serde(default)]
    pub mitigation_enabled: Option<bool>,
    #[serde(default)]
    pub capacity_tier: Option<CapacityTier>,
}

impl ScenarioStep {
    /// Overlay this step onto `controls`.
    pub fn apply(&self, mut controls: ControlInputs) -> ControlInputs {
        if let Some(value) = self.attack_enabled {
            controls.attack_enabled = value;
        }
        if let Some(value) = self.attack_intensity {
            controls.attack_intensity = value;
        }
        if let Some(value) = self.attack_type {
            controls.attack_type = value;
        }
        if let Some(value) = self.legit_enabled {
            controls.legit_enabled = value;
        }
        if let Some(value) = self.legit_intensity {
            controls.legit_intensity = value;
        }
        if let Some(value) = self.mitigation_enabled {
            controls.mitigation_enabled = value;
        }
        if let Some(value) = self.capacity_tier {
            controls.capacity_tier = value;
        }
        controls
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }
}

/// In-memory timeline that releases steps as the tick counter reaches them.
#[derive(Debug, Default, Clone)]
pub struct ScenarioPlayer {
    source: Option<PathBuf>,
    steps: Vec<ScenarioStep>,
    cursor: usize,
}

impl ScenarioPlayer {
    pub fn new(mut steps: Vec<ScenarioStep>) -> Self {
        steps.sort_by_key(|step| step.at_tick);
        Self {
            source: None,
            steps,
            cursor: 0,
        }
    }

    /// Load a `.json` or `.csv` scenario file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut player = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let contents = fs::read_to_string(path).map_err(|source| SimError::ScenarioIo {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json_str(&contents)?
            }
            Some("csv") => {
                let file = fs::File::open(path).map_err(|source| SimError::ScenarioIo {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_csv_reader(file, path)?
            }
            _ => return Err(SimError::ScenarioFormat(path.to_path_buf())),
        };
        debug!(
            target: "stormwall::sim::scenario",
            path = %path.display(),
            steps = player.steps.len(),
            "scenario loaded"
        );
        player.source = Some(path.to_path_buf());
        Ok(player)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let steps: Vec<ScenarioStep> = serde_json::from_str(contents)?;
        Ok(Self::new(steps))
    }

    /// Parse CSV with a header row; empty cells leave the control untouched.
    pub fn from_csv_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut steps = Vec::new();
        for (index, row) in reader.deserialize::<ScenarioStep>().enumerate() {
            let step = row.map_err(|err| SimError::ScenarioParse {
                path: origin.to_path_buf(),
                index,
                reason: err.to_string(),
            })?;
            steps.push(step);
        }
        Ok(Self::new(steps))
    }

    /// Steps whose tick has been reached since the previous call.
    pub fn due(&mut self, tick: u64) -> &[ScenarioStep] {
        let start = self.cursor;
        while self.cursor < self.steps.len() && self.steps[self.cursor].at_tick <= tick {
            self.cursor += 1;
        }
        &self.steps[start..self.cursor]
    }

    /// Apply every step due before the engine's next tick and return them.
    pub fn apply_due(&mut self, engine: &mut Engine) -> Result<&[ScenarioStep]> {
        let due = self.due(engine.ticks());
        for step in due {
            engine.configure(step.apply(engine.controls()))?;
        }
        Ok(due)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Tick of the final scheduled step.
    pub fn last_tick(&self) -> Option<u64> {
        self.steps.last().map(|step| step.at_tick)
    }

    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn loads_json_scenarios() -> Result<()> {
        let mut file = Builder::new().suffix(".json").tempfile()?;
        writeln!(
            file,
            "{}",
            r#"[{"at_tick":120,"label":"flood","attack_enabled":true,"attack_intensity":90},
                {"at_tick":0,"label":"warmup","legit_intensity":40}]"#
        )?;
        file.flush()?;
        let path = file.into_temp_path();
        let player = ScenarioPlayer::from_path(path.as_ref())?;
        assert_eq!(player.steps().len(), 2);
        assert_eq!(player.steps()[0].display_label(), "warmup");
        assert_eq!(player.last_tick(), Some(120));
        assert!(player.source().is_some());
        path.close()?;
        Ok(())
    }

    #[test]
    fn loads_csv_scenarios_with_blank_cells() -> Result<()> {
        let mut file = Builder::new().suffix(".csv").tempfile()?;
        writeln!(
            file,
            "at_tick,label,attack_enabled,attack_intensity,attack_type,legit_enabled,legit_intensity,mitigation_enabled,capacity_tier"
        )?;
        writeln!(file, "0,baseline,,,,true,30,,")?;
        writeln!(file, "60,l7 flood,true,80,l7,,,,")?;
        writeln!(file, "180,scale out,,,,,,true,edge")?;
        file.flush()?;
        let path = file.into_temp_path();
        let player = ScenarioPlayer::from_path(path.as_ref())?;
        let steps = player.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].attack_enabled, None);
        assert_eq!(steps[1].attack_type, Some(AttackType::Application));
        assert_eq!(steps[2].capacity_tier, Some(CapacityTier::Ultra));
        path.close()?;
        Ok(())
    }

    #[test]
    fn rejects_misspelled_json_keys() {
        let err = ScenarioPlayer::from_json_str(r#"[{"at_tick":10,"attack_intesity":90}]"#)
            .unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
        assert!(err.to_string().contains("attack_intesity"));
    }

    #[test]
    fn rejects_unknown_csv_columns() -> Result<()> {
        let mut file = Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "at_tick,attack_enabled,mitigaton_enabled")?;
        writeln!(file, "0,true,true")?;
        file.flush()?;
        let path = file.into_temp_path();
        let err = ScenarioPlayer::from_path(path.as_ref()).unwrap_err();
        assert!(matches!(err, SimError::ScenarioParse { index: 0, .. }));
        path.close()?;
        Ok(())
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = ScenarioPlayer::from_path(Path::new("scenario.yaml")).unwrap_err();
        assert!(matches!(err, SimError::ScenarioFormat(_)));
    }

    #[test]
    fn due_releases_each_step_once() {
        let mut player = ScenarioPlayer::new(vec![
            ScenarioStep {
                at_tick: 10,
                attack_enabled: Some(true),
                ..Default::default()
            },
            ScenarioStep {
                at_tick: 10,
                mitigation_enabled: Some(true),
                ..Default::default()
            },
            ScenarioStep {
                at_tick: 30,
                attack_enabled: Some(false),
                ..Default::default()
            },
        ]);
        assert!(player.due(9).is_empty());
        assert_eq!(player.due(10).len(), 2);
        assert!(player.due(11).is_empty());
        assert_eq!(player.due(100).len(), 1);
        assert!(player.is_finished());
        player.rewind();
        assert_eq!(player.due(100).len(), 3);
    }

    #[test]
    fn apply_overlays_only_set_fields() {
        let base = ControlInputs::default();
        let step = ScenarioStep {
            at_tick: 0,
            attack_enabled: Some(true),
            capacity_tier: Some(CapacityTier::Standard),
            ..Default::default()
        };
        let next = step.apply(base);
        assert!(next.attack_enabled);
        assert_eq!(next.capacity_tier, CapacityTier::Standard);
        assert_eq!(next.legit_intensity, base.legit_intensity);
        assert_eq!(next.attack_type, base.attack_type);
    }

    #[test]
    fn apply_due_reconfigures_engine_before_tick() -> Result<()> {
        let mut engine = Engine::with_defaults();
        let mut player = ScenarioPlayer::new(vec![
            ScenarioStep {
                at_tick: 0,
                capacity_tier: Some(CapacityTier::Ultra),
                ..Default::default()
            },
            ScenarioStep {
                at_tick: 2,
                attack_enabled: Some(true),
                attack_intensity: Some(250),
                ..Default::default()
            },
        ]);
        assert_eq!(player.apply_due(&mut engine)?.len(), 1);
        assert_eq!(engine.capacity(), 10_000_000.0);
        engine.tick();
        assert!(player.apply_due(&mut engine)?.is_empty());
        engine.tick();
        let applied = player.apply_due(&mut engine)?;
        assert_eq!(applied.len(), 1);
        assert!(engine.controls().attack_enabled);
        assert_eq!(engine.controls().attack_intensity, 100);
        assert!(player.is_finished());
        Ok(())
    }
}
