use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of one land patch, i.e. one vertex of the patch graph.
///
/// Identity is stable for the whole run: patch kind swaps replace the payload
/// behind the id, never the id itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PatchId(u32);

impl PatchId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("the edge list is empty")]
    EmptyGraph,
    #[error("vertex {0} has an edge to itself")]
    SelfLoop(u32),
    #[error("adjacency is asymmetric: {0} lists {1} but not the reverse")]
    Asymmetric(u32, u32),
    #[error("vertex {0} is not part of the topology")]
    UnknownVertex(u32),
}

/// Immutable vertex-to-neighbours index built once before a run.
///
/// The simulation never mutates topology; every cross-entity reference
/// (firefighter location, spread target) resolves through this index by id.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    neighbours: HashMap<PatchId, Vec<PatchId>>,
    ordered_ids: Vec<PatchId>,
}

impl AdjacencyIndex {
    /// Build a symmetric adjacency index from an undirected edge list.
    ///
    /// Self-loops are rejected; duplicate edges collapse to one.
    pub fn from_edges(edges: &[(u32, u32)]) -> Result<Self, TopologyError> {
        if edges.is_empty() {
            return Err(TopologyError::EmptyGraph);
        }

        let mut neighbours: HashMap<PatchId, Vec<PatchId>> = HashMap::new();
        for &(a, b) in edges {
            if a == b {
                return Err(TopologyError::SelfLoop(a));
            }
            let (a, b) = (PatchId::new(a), PatchId::new(b));
            let forward = neighbours.entry(a).or_default();
            if !forward.contains(&b) {
                forward.push(b);
            }
            let backward = neighbours.entry(b).or_default();
            if !backward.contains(&a) {
                backward.push(a);
            }
        }

        for list in neighbours.values_mut() {
            list.sort();
        }

        let mut ordered_ids: Vec<PatchId> = neighbours.keys().copied().collect();
        ordered_ids.sort();

        let index = Self {
            neighbours,
            ordered_ids,
        };
        index.check_symmetry()?;
        Ok(index)
    }

    /// Verify that every listed neighbour relation holds in both directions
    /// and references a known vertex. `from_edges` output always passes; this
    /// exists to reject hand-assembled indices.
    pub fn check_symmetry(&self) -> Result<(), TopologyError> {
        for (vertex, list) in &self.neighbours {
            for neighbour in list {
                let Some(reverse) = self.neighbours.get(neighbour) else {
                    return Err(TopologyError::UnknownVertex(neighbour.raw()));
                };
                if !reverse.contains(vertex) {
                    return Err(TopologyError::Asymmetric(vertex.raw(), neighbour.raw()));
                }
            }
        }
        Ok(())
    }

    /// Vertex ids in ascending order. Patch transitions iterate in this order
    /// so that seeded runs draw in a stable sequence.
    pub fn ids(&self) -> &[PatchId] {
        &self.ordered_ids
    }

    pub fn contains(&self, id: PatchId) -> bool {
        self.neighbours.contains_key(&id)
    }

    pub fn neighbours(&self, id: PatchId) -> Option<&[PatchId]> {
        self.neighbours.get(&id).map(Vec::as_slice)
    }

    pub fn vertex_count(&self) -> usize {
        self.ordered_ids.len()
    }
}
