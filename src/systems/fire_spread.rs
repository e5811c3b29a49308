use anyhow::{anyhow, Result};

use crate::{
    engine::{System, SystemContext},
    rng::{RngExt, SystemRng},
    world::World,
};

/// Propagates fire along graph edges from the source set the growth phase
/// captured at tick start. Sources are not re-checked: a patch that burned
/// out earlier this tick was still burning when the tick began and spreads.
pub struct FireSpreadSystem;

impl FireSpreadSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FireSpreadSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FireSpreadSystem {
    fn name(&self) -> &str {
        "fire_spread"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let sources = std::mem::take(&mut world.ledger.spread_sources);
        let adjacency = world.adjacency();
        for source in sources {
            let neighbours = adjacency
                .neighbours(source)
                .ok_or_else(|| anyhow!("spread source {source} is missing from the topology"))?;
            for &neighbour in neighbours {
                let patch = world
                    .patches
                    .get_mut(&neighbour)
                    .ok_or_else(|| anyhow!("vertex {neighbour} has no patch assigned"))?;
                // only calm forested neighbours draw; bare ground is immune
                if patch.is_forested()
                    && !patch.is_ignited()
                    && rng.chance(ctx.params.fire_spread)
                {
                    patch.ignite();
                }
            }
        }
        Ok(())
    }
}
