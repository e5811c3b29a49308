use serde::{Deserialize, Serialize};

use crate::topology::PatchId;

pub const STARTING_HEALTH: f64 = 100.0;
pub const BURN_PENALTY: f64 = 10.0;
pub const REST_RECOVERY: f64 = 5.0;

/// A mobile suppression agent. Firefighters are never removed from the
/// roster; a dead one keeps its last known patch for bookkeeping and is
/// skipped by the firefighter system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firefighter {
    /// Extinguish success probability as a percentage, 0..=100.
    pub skill: f64,
    /// Unclamped; may exceed 100 or go negative. Health never kills on its
    /// own, only the failed-extinguish death roll does.
    pub health: f64,
    pub current_patch: PatchId,
    pub alive: bool,
}

impl Firefighter {
    pub fn new(skill: f64, current_patch: PatchId) -> Self {
        Self {
            skill,
            health: STARTING_HEALTH,
            current_patch,
            alive: true,
        }
    }

    pub fn extinguish_probability(&self) -> f64 {
        self.skill / 100.0
    }

    /// Threshold for the integer death roll in [0, 100]; a roll at or below
    /// it kills the firefighter.
    pub fn save_threshold(&self) -> f64 {
        3.0 - self.skill / 100.0
    }

    pub fn apply_exposure(&mut self, on_burning_patch: bool) {
        if on_burning_patch {
            self.health -= BURN_PENALTY;
        } else {
            self.health += REST_RECOVERY;
        }
    }
}
