use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::patch::PatchKind;
use crate::topology::{AdjacencyIndex, PatchId, TopologyError};
use crate::world::{RunParameters, World};

fn default_ticks() -> u64 {
    10
}

fn default_snapshot_interval_ticks() -> u64 {
    0
}

fn default_tree_ratio() -> f64 {
    30.0
}

fn default_firefighters() -> usize {
    3
}

fn default_firefighter_skill() -> f64 {
    25.0
}

fn default_autocombustion() -> f64 {
    0.3
}

fn default_fire_spread() -> f64 {
    0.3
}

fn default_regrowth() -> f64 {
    0.1
}

/// One run's full configuration, loaded from YAML. The edge list is the
/// externally built graph; everything else is a validated scalar.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    /// Percentage of vertices populated as forest, 1..=99.
    #[serde(default = "default_tree_ratio")]
    pub tree_ratio_pct: f64,
    #[serde(default = "default_firefighters")]
    pub firefighters: usize,
    /// Extinguish success probability as a percentage, 0..=100.
    #[serde(default = "default_firefighter_skill")]
    pub firefighter_skill: f64,
    #[serde(default = "default_autocombustion")]
    pub autocombustion: f64,
    #[serde(default = "default_fire_spread")]
    pub fire_spread: f64,
    #[serde(default = "default_regrowth")]
    pub regrowth: f64,
    /// Vertices forced Forested and ignited at tick 0. Useful for demos and
    /// deterministic fixtures; autocombustion starts fires otherwise.
    #[serde(default)]
    pub initial_fires: Vec<u32>,
    pub edges: Vec<(u32, u32)>,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("tree ratio must be within 1-99, got {0}")]
    TreeRatio(f64),
    #[error("at least one firefighter is required")]
    FirefighterCount,
    #[error("firefighter skill must be within 0-100, got {0}")]
    FirefighterSkill(f64),
    #[error("{name} probability must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[error("tick limit must be at least 1")]
    TickLimit,
    #[error("initial fire references vertex {0} outside the topology")]
    UnknownInitialFire(u32),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Reject parameter-range errors before any engine exists. The engine
    /// itself assumes validated inputs.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(1.0..=99.0).contains(&self.tree_ratio_pct) {
            return Err(ScenarioError::TreeRatio(self.tree_ratio_pct));
        }
        if self.firefighters == 0 {
            return Err(ScenarioError::FirefighterCount);
        }
        if !(0.0..=100.0).contains(&self.firefighter_skill) {
            return Err(ScenarioError::FirefighterSkill(self.firefighter_skill));
        }
        for (name, value) in [
            ("autocombustion", self.autocombustion),
            ("fire_spread", self.fire_spread),
            ("regrowth", self.regrowth),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScenarioError::Probability { name, value });
            }
        }
        if self.ticks == Some(0) {
            return Err(ScenarioError::TickLimit);
        }
        Ok(())
    }

    pub fn params(&self) -> RunParameters {
        RunParameters {
            autocombustion: self.autocombustion,
            fire_spread: self.fire_spread,
            regrowth: self.regrowth,
        }
    }

    pub fn adjacency(&self) -> Result<AdjacencyIndex, TopologyError> {
        AdjacencyIndex::from_edges(&self.edges)
    }

    /// Build the initial world: topology, patch population, seeded fires and
    /// firefighter deployment, with the tick-0 statistics entry recorded.
    /// Placement draws come from a generator seeded directly with the
    /// scenario seed, so the same file rebuilds the same world.
    pub fn build_world(&self) -> Result<World, ScenarioError> {
        let adjacency = Arc::new(self.adjacency()?);
        let mut world = World::new(Arc::clone(&adjacency));
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        world.populate(self.tree_ratio_pct, self.params(), &mut rng);

        for &raw in &self.initial_fires {
            let id = PatchId::new(raw);
            if !adjacency.contains(id) {
                return Err(ScenarioError::UnknownInitialFire(raw));
            }
            if !world.patch(id).is_some_and(|patch| patch.is_forested()) {
                world.set_kind(id, PatchKind::forested(self.autocombustion))?;
            }
            world.ignite(id)?;
        }

        world.deploy_firefighters(self.firefighters, self.firefighter_skill, &mut rng);
        world.record_initial();
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or_else(default_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        "name: unit\nseed: 3\nedges:\n  - [0, 1]\n  - [1, 2]\n"
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.validate().unwrap();
        assert_eq!(scenario.tree_ratio_pct, 30.0);
        assert_eq!(scenario.firefighters, 3);
        assert_eq!(scenario.fire_spread, 0.3);
        assert_eq!(scenario.ticks(None), 10);
        assert_eq!(scenario.ticks(Some(25)), 25);
    }

    #[test]
    fn validation_rejects_out_of_range_probabilities() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.fire_spread = 1.2;
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::Probability {
                name: "fire_spread",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_zero_firefighters_and_zero_ticks() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.firefighters = 0;
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::FirefighterCount)
        ));

        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.ticks = Some(0);
        assert!(matches!(scenario.validate(), Err(ScenarioError::TickLimit)));
    }

    #[test]
    fn initial_fires_must_reference_known_vertices() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.initial_fires = vec![9];
        assert!(matches!(
            scenario.build_world(),
            Err(ScenarioError::UnknownInitialFire(9))
        ));
    }

    #[test]
    fn build_world_seeds_requested_fires() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.initial_fires = vec![1];
        let world = scenario.build_world().unwrap();
        assert!(world.patch(PatchId::new(1)).unwrap().is_ignited());
        assert_eq!(world.stats().len(), 1);
        assert_eq!(world.stats().ignited[0], 1);
    }
}
