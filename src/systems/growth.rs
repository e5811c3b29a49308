use anyhow::{anyhow, Result};

use crate::{
    engine::{System, SystemContext},
    patch::{PatchKind, BURN_DAMAGE_PER_TICK, FULL_HEALTH, REGROWTH_PER_TICK},
    rng::{RngExt, SystemRng},
    world::World,
};

/// Per-patch state transitions: regrowth, autocombustion, burn damage and the
/// two kind swaps. Runs first in the schedule and visits vertices in
/// ascending id order.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        // Fix the fire-spread source set before any patch mutates, so patches
        // ignited later this tick cannot cascade within the same tick.
        world.ledger.spread_sources = world.ignited_patch_ids();

        let ids = world.patch_ids().to_vec();
        for id in ids {
            let patch = world
                .patches
                .get_mut(&id)
                .ok_or_else(|| anyhow!("vertex {id} has no patch assigned"))?;

            let next_kind = match &mut patch.kind {
                PatchKind::Forested {
                    health, ignited, ..
                } if *ignited => {
                    *health -= BURN_DAMAGE_PER_TICK;
                    // death check runs immediately; health 0 survives
                    (*health < 0).then(|| PatchKind::bare(ctx.params.regrowth))
                }
                PatchKind::Forested {
                    health,
                    ignited,
                    autocombustion,
                } => {
                    *health = (*health + REGROWTH_PER_TICK).min(FULL_HEALTH);
                    if rng.chance(*autocombustion) {
                        *ignited = true;
                    }
                    None
                }
                PatchKind::Bare { regrowth } => rng
                    .chance(*regrowth)
                    .then(|| PatchKind::forested(ctx.params.autocombustion)),
            };

            if let Some(kind) = next_kind {
                match kind {
                    PatchKind::Bare { .. } => world.stats.consumed_by_fire += 1,
                    PatchKind::Forested { .. } => world.stats.regrown += 1,
                }
                patch.kind = kind;
            }
        }
        Ok(())
    }
}
