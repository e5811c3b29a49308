pub mod engine;
pub mod firefighter;
pub mod patch;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod stats;
pub mod systems;
pub mod topology;
pub mod web;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use scenario::{Scenario, ScenarioLoader};
pub use topology::{AdjacencyIndex, PatchId};
pub use world::{World, WorldSnapshot};
