use anyhow::{bail, Result};
use rand::seq::SliceRandom;

use crate::{
    engine::{System, SystemContext},
    patch::Patch,
    rng::{RngExt, SystemRng},
    topology::PatchId,
    world::World,
};

/// Firefighter decisions in roster order: extinguish on a burning patch,
/// otherwise chase a burning neighbour (random walk when none is visible),
/// then take exposure damage or recover.
pub struct FirefighterSystem;

impl FirefighterSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FirefighterSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FirefighterSystem {
    fn name(&self) -> &str {
        "firefighters"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let adjacency = world.adjacency();
        for index in 0..world.firefighters.len() {
            if !world.firefighters[index].alive {
                continue;
            }

            let station = world.firefighters[index].current_patch;
            let Some(patch) = world.patches.get(&station) else {
                // broken invariant, not a recoverable condition
                bail!("firefighter {index} is stationed on unknown patch {station}");
            };

            if patch.is_ignited() {
                let success = rng.chance(world.firefighters[index].extinguish_probability());
                if success {
                    if let Some(patch) = world.patches.get_mut(&station) {
                        patch.extinguish();
                    }
                } else {
                    let roll = rng.percent_roll();
                    if f64::from(roll) <= world.firefighters[index].save_threshold() {
                        world.firefighters[index].alive = false;
                        world.stats.dead_firefighters += 1;
                    }
                }
            } else {
                let neighbours = adjacency.neighbours(station).unwrap_or(&[]);
                let burning: Vec<PatchId> = neighbours
                    .iter()
                    .copied()
                    .filter(|id| world.patches.get(id).is_some_and(Patch::is_ignited))
                    .collect();
                let destination = if burning.is_empty() {
                    neighbours.choose(rng).copied()
                } else {
                    burning.choose(rng).copied()
                };
                if let Some(destination) = destination {
                    world.firefighters[index].current_patch = destination;
                }
            }

            // exposure is judged on the patch occupied after the action
            let here = world.firefighters[index].current_patch;
            let burning_now = world.patches.get(&here).is_some_and(Patch::is_ignited);
            world.firefighters[index].apply_exposure(burning_now);
        }
        Ok(())
    }
}
