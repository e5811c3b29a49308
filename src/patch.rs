use serde::{Deserialize, Serialize};

use crate::topology::PatchId;

/// Health a freshly grown (or regrown) forested patch starts with.
pub const FULL_HEALTH: i32 = 256;
/// Health recovered per quiet tick.
pub const REGROWTH_PER_TICK: i32 = 10;
/// Health lost per tick while burning.
pub const BURN_DAMAGE_PER_TICK: i32 = 20;

/// Payload of a land patch. Swapping the variant replaces the payload behind
/// the patch id; the id and the neighbour relations in the adjacency index
/// stay untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatchKind {
    Forested {
        health: i32,
        ignited: bool,
        autocombustion: f64,
    },
    Bare {
        regrowth: f64,
    },
}

impl PatchKind {
    pub fn forested(autocombustion: f64) -> Self {
        PatchKind::Forested {
            health: FULL_HEALTH,
            ignited: false,
            autocombustion,
        }
    }

    pub fn bare(regrowth: f64) -> Self {
        PatchKind::Bare { regrowth }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub id: PatchId,
    pub kind: PatchKind,
}

impl Patch {
    pub fn new(id: PatchId, kind: PatchKind) -> Self {
        Self { id, kind }
    }

    pub fn is_forested(&self) -> bool {
        matches!(self.kind, PatchKind::Forested { .. })
    }

    pub fn is_ignited(&self) -> bool {
        matches!(self.kind, PatchKind::Forested { ignited: true, .. })
    }

    pub fn ignite(&mut self) {
        if let PatchKind::Forested { ignited, .. } = &mut self.kind {
            *ignited = true;
        }
    }

    pub fn extinguish(&mut self) {
        if let PatchKind::Forested { ignited, .. } = &mut self.kind {
            *ignited = false;
        }
    }

    /// Severity code handed to the visualiser: health (0..=256) for a calm
    /// forested patch, health - 256 for a burning one, nothing for bare
    /// ground.
    pub fn severity(&self) -> Option<i32> {
        match self.kind {
            PatchKind::Forested {
                health, ignited, ..
            } => Some(if ignited { health - FULL_HEALTH } else { health }),
            PatchKind::Bare { .. } => None,
        }
    }
}
