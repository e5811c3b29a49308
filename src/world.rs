use std::collections::HashMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::firefighter::Firefighter;
use crate::patch::{Patch, PatchKind};
use crate::stats::{StatsLog, TickCounts};
use crate::topology::{AdjacencyIndex, PatchId, TopologyError};

/// Run-wide probabilities fixed at engine construction. Per-patch payloads
/// copy autocombustion/regrowth at creation time; fire spread is only ever
/// checked against this record, per edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub autocombustion: f64,
    pub fire_spread: f64,
    pub regrowth: f64,
}

/// Scratch state the systems hand to each other within one tick.
#[derive(Debug, Default)]
pub(crate) struct TickLedger {
    /// Patches that were burning when the tick started. Captured before any
    /// transition so same-tick ignitions never cascade.
    pub(crate) spread_sources: Vec<PatchId>,
}

/// The aggregate simulation state: one patch per vertex of the shared
/// adjacency index, plus the firefighter roster and the statistics log.
///
/// Invariant: the patch map's key set equals the adjacency index's key set
/// for the whole run. Kind swaps replace payloads in place.
pub struct World {
    adjacency: Arc<AdjacencyIndex>,
    pub(crate) patches: HashMap<PatchId, Patch>,
    pub(crate) firefighters: Vec<Firefighter>,
    pub(crate) ledger: TickLedger,
    pub(crate) stats: StatsLog,
    tick: u64,
}

impl World {
    pub fn new(adjacency: Arc<AdjacencyIndex>) -> Self {
        Self {
            adjacency,
            patches: HashMap::new(),
            firefighters: Vec::new(),
            ledger: TickLedger::default(),
            stats: StatsLog::default(),
            tick: 0,
        }
    }

    /// Assign every vertex a patch: a rounded `tree_ratio_pct` percent of
    /// them Forested, sampled without replacement, the rest Bare.
    pub fn populate(&mut self, tree_ratio_pct: f64, params: RunParameters, rng: &mut impl Rng) {
        let ids = self.adjacency.ids().to_vec();
        let tree_count = (ids.len() as f64 * tree_ratio_pct / 100.0).round() as usize;
        let forested: Vec<PatchId> = ids.choose_multiple(rng, tree_count).copied().collect();

        self.patches.clear();
        for id in ids {
            let kind = if forested.contains(&id) {
                PatchKind::forested(params.autocombustion)
            } else {
                PatchKind::bare(params.regrowth)
            };
            self.patches.insert(id, Patch::new(id, kind));
        }
    }

    /// Place `count` firefighters of the given skill on random vertices.
    pub fn deploy_firefighters(&mut self, count: usize, skill: f64, rng: &mut impl Rng) {
        let ids = self.adjacency.ids();
        for _ in 0..count {
            let start = *ids.choose(rng).expect("topology has at least one vertex");
            self.firefighters.push(Firefighter::new(skill, start));
        }
        self.stats.initial_firefighters = self.firefighters.len();
    }

    pub fn add_firefighter(&mut self, firefighter: Firefighter) {
        self.firefighters.push(firefighter);
        self.stats.initial_firefighters = self.firefighters.len();
    }

    /// Record the tick-0 entry of the statistics series. Call once after
    /// population and deployment.
    pub fn record_initial(&mut self) {
        if self.stats.is_empty() {
            let counts = self.counts();
            self.stats.record(counts);
        }
    }

    pub fn set_kind(&mut self, id: PatchId, kind: PatchKind) -> Result<(), TopologyError> {
        match self.patches.get_mut(&id) {
            Some(patch) => {
                patch.kind = kind;
                Ok(())
            }
            None => Err(TopologyError::UnknownVertex(id.raw())),
        }
    }

    pub fn ignite(&mut self, id: PatchId) -> Result<(), TopologyError> {
        match self.patches.get_mut(&id) {
            Some(patch) => {
                patch.ignite();
                Ok(())
            }
            None => Err(TopologyError::UnknownVertex(id.raw())),
        }
    }

    pub fn adjacency(&self) -> Arc<AdjacencyIndex> {
        Arc::clone(&self.adjacency)
    }

    /// Vertex ids in the fixed ascending order every per-patch phase uses.
    pub fn patch_ids(&self) -> &[PatchId] {
        self.adjacency.ids()
    }

    pub fn patch(&self, id: PatchId) -> Option<&Patch> {
        self.patches.get(&id)
    }

    pub fn firefighters(&self) -> &[Firefighter] {
        &self.firefighters
    }

    pub fn stats(&self) -> &StatsLog {
        &self.stats
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.vertex_count()
    }

    /// Ids of currently burning patches, ascending.
    pub fn ignited_patch_ids(&self) -> Vec<PatchId> {
        self.adjacency
            .ids()
            .iter()
            .copied()
            .filter(|id| self.patches.get(id).is_some_and(Patch::is_ignited))
            .collect()
    }

    pub fn counts(&self) -> TickCounts {
        let mut forested = 0;
        let mut bare = 0;
        let mut ignited = 0;
        for patch in self.patches.values() {
            if patch.is_forested() {
                forested += 1;
                if patch.is_ignited() {
                    ignited += 1;
                }
            } else {
                bare += 1;
            }
        }
        TickCounts {
            forested,
            bare,
            ignited,
            firefighters_alive: self.stats.alive_firefighters(),
        }
    }

    /// The full per-tick colour signal for the visualiser. Bare patches are
    /// omitted by convention.
    pub fn severity_map(&self) -> Vec<VertexSeverity> {
        self.adjacency
            .ids()
            .iter()
            .filter_map(|id| {
                let code = self.patches.get(id)?.severity()?;
                Some(VertexSeverity { id: id.raw(), code })
            })
            .collect()
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            counts: self.counts(),
            severity: self.severity_map(),
            firefighters: self
                .firefighters
                .iter()
                .map(|f| FirefighterSnapshot {
                    patch: f.current_patch.raw(),
                    health: f.health,
                    alive: f.alive,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexSeverity {
    pub id: u32,
    pub code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirefighterSnapshot {
    pub patch: u32,
    pub health: f64,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub counts: TickCounts,
    pub severity: Vec<VertexSeverity>,
    pub firefighters: Vec<FirefighterSnapshot>,
}
