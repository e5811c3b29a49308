use std::path::PathBuf;
use std::sync::Arc;

use pyrograph::{
    engine::{Engine, EngineBuilder, EngineSettings},
    firefighter::Firefighter,
    patch::PatchKind,
    systems::{BookkeepingSystem, FireSpreadSystem, FirefighterSystem, GrowthSystem},
    topology::{AdjacencyIndex, PatchId},
    world::{RunParameters, World},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn engine_with(seed: u64, params: RunParameters) -> Engine {
    let settings = EngineSettings {
        scenario_name: "fixture".to_string(),
        seed,
        params,
        snapshot_interval_ticks: 0,
        snapshot_dir: PathBuf::from("unused"),
    };
    EngineBuilder::new(settings)
        .with_system(GrowthSystem::new())
        .with_system(FireSpreadSystem::new())
        .with_system(FirefighterSystem::new())
        .with_system(BookkeepingSystem::new())
        .build()
}

fn forested_world(edges: &[(u32, u32)], params: RunParameters) -> World {
    let adjacency = Arc::new(AdjacencyIndex::from_edges(edges).unwrap());
    let mut world = World::new(adjacency);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    world.populate(100.0, params, &mut rng);
    world
}

fn bare_world(edges: &[(u32, u32)], params: RunParameters) -> World {
    let adjacency = Arc::new(AdjacencyIndex::from_edges(edges).unwrap());
    let mut world = World::new(adjacency);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    world.populate(0.0, params, &mut rng);
    world
}

#[test]
fn certain_spread_ignites_every_neighbour() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 1.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1), (1, 2), (0, 2)], params);
    world.ignite(PatchId::new(0)).unwrap();

    let mut engine = engine_with(1, params);
    engine.run(&mut world, 1).unwrap();

    assert!(world.patch(PatchId::new(0)).unwrap().is_ignited());
    assert!(world.patch(PatchId::new(1)).unwrap().is_ignited());
    assert!(world.patch(PatchId::new(2)).unwrap().is_ignited());
}

#[test]
fn fire_advances_one_edge_per_tick() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 1.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1), (1, 2)], params);
    world.ignite(PatchId::new(0)).unwrap();

    let mut engine = engine_with(1, params);
    engine.run(&mut world, 1).unwrap();

    // patch 1 catches on the first tick, patch 2 is two edges away
    assert!(world.patch(PatchId::new(1)).unwrap().is_ignited());
    assert!(!world.patch(PatchId::new(2)).unwrap().is_ignited());

    engine.run(&mut world, 1).unwrap();
    assert!(world.patch(PatchId::new(2)).unwrap().is_ignited());
}

#[test]
fn regrowth_stops_at_full_health() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1)], params);
    world
        .set_kind(
            PatchId::new(0),
            PatchKind::Forested {
                health: 250,
                ignited: false,
                autocombustion: 0.0,
            },
        )
        .unwrap();

    let mut engine = engine_with(1, params);
    engine.run(&mut world, 1).unwrap();
    assert_eq!(world.patch(PatchId::new(0)).unwrap().severity(), Some(256));

    engine.run(&mut world, 5).unwrap();
    assert_eq!(world.patch(PatchId::new(0)).unwrap().severity(), Some(256));
}

#[test]
fn zero_regrowth_never_recovers() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = bare_world(&[(0, 1)], params);
    let mut engine = engine_with(42, params);
    engine.run(&mut world, 1000).unwrap();

    let counts = world.counts();
    assert_eq!(counts.bare, 2);
    assert_eq!(counts.forested, 0);
}

#[test]
fn certain_regrowth_recovers_next_tick() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 1.0,
    };
    let mut world = bare_world(&[(0, 1)], params);
    let mut engine = engine_with(42, params);
    engine.run(&mut world, 1).unwrap();

    for id in [PatchId::new(0), PatchId::new(1)] {
        let patch = world.patch(id).unwrap();
        assert!(patch.is_forested());
        assert!(!patch.is_ignited());
        assert_eq!(patch.severity(), Some(256));
    }
    assert_eq!(world.stats().regrown, 2);
}

#[test]
fn burned_out_patch_keeps_its_vertex() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 1.0,
    };
    let mut world = forested_world(&[(0, 1)], params);
    world
        .set_kind(
            PatchId::new(0),
            PatchKind::Forested {
                health: 5,
                ignited: true,
                autocombustion: 0.0,
            },
        )
        .unwrap();

    let mut engine = engine_with(9, params);
    engine.run(&mut world, 1).unwrap();

    let patch = world.patch(PatchId::new(0)).unwrap();
    assert_eq!(patch.id, PatchId::new(0));
    assert!(!patch.is_forested());
    assert_eq!(world.stats().consumed_by_fire, 1);

    // the replacement bare patch carries the run's regrowth, so one more
    // tick brings the vertex back as fresh forest
    engine.run(&mut world, 1).unwrap();
    let patch = world.patch(PatchId::new(0)).unwrap();
    assert!(patch.is_forested());
    assert!(!patch.is_ignited());
}

#[test]
fn zero_health_survives_the_burn_check() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1)], params);
    world
        .set_kind(
            PatchId::new(0),
            PatchKind::Forested {
                health: 20,
                ignited: true,
                autocombustion: 0.0,
            },
        )
        .unwrap();

    let mut engine = engine_with(5, params);
    engine.run(&mut world, 1).unwrap();

    // exactly zero health is still standing forest
    let patch = world.patch(PatchId::new(0)).unwrap();
    assert!(patch.is_forested());
    assert!(patch.is_ignited());
    assert_eq!(patch.severity(), Some(-256));
    assert_eq!(world.stats().consumed_by_fire, 0);

    // one more burning tick drops it below zero
    engine.run(&mut world, 1).unwrap();
    assert!(!world.patch(PatchId::new(0)).unwrap().is_forested());
    assert_eq!(world.stats().consumed_by_fire, 1);
}

#[test]
fn failed_rescues_eventually_kill() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1)], params);
    // enough health to keep the patch burning for the whole run
    world
        .set_kind(
            PatchId::new(0),
            PatchKind::Forested {
                health: 20_000,
                ignited: true,
                autocombustion: 0.0,
            },
        )
        .unwrap();
    world.add_firefighter(Firefighter::new(0.0, PatchId::new(0)));

    let mut engine = engine_with(17, params);
    for _ in 0..500 {
        engine.run(&mut world, 1).unwrap();
        if !world.firefighters()[0].alive {
            break;
        }
    }

    // a skill-0 agent rolls against threshold 3 every tick; 500 burning
    // ticks make survival vanishingly unlikely
    let firefighter = &world.firefighters()[0];
    assert!(!firefighter.alive);
    assert_eq!(firefighter.current_patch, PatchId::new(0));
    assert_eq!(world.stats().dead_firefighters, 1);
    assert_eq!(world.counts().firefighters_alive, 0);
}

#[test]
fn perfect_skill_always_extinguishes() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1)], params);
    world.ignite(PatchId::new(0)).unwrap();
    world.add_firefighter(Firefighter::new(100.0, PatchId::new(0)));

    let mut engine = engine_with(3, params);
    engine.run(&mut world, 1).unwrap();

    assert!(!world.patch(PatchId::new(0)).unwrap().is_ignited());
    let firefighter = &world.firefighters()[0];
    assert!(firefighter.alive);
    // the patch is calm once the action resolves, so exposure recovers
    assert_eq!(firefighter.health, 105.0);
}

#[test]
fn dead_firefighters_do_nothing() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1)], params);
    world.ignite(PatchId::new(0)).unwrap();
    let mut fallen = Firefighter::new(100.0, PatchId::new(0));
    fallen.alive = false;
    fallen.health = 40.0;
    world.add_firefighter(fallen);

    let mut engine = engine_with(3, params);
    engine.run(&mut world, 2).unwrap();

    assert!(world.patch(PatchId::new(0)).unwrap().is_ignited());
    let firefighter = &world.firefighters()[0];
    assert!(!firefighter.alive);
    assert_eq!(firefighter.health, 40.0);
    assert_eq!(firefighter.current_patch, PatchId::new(0));
}

#[test]
fn firefighters_chase_burning_neighbours() {
    let params = RunParameters {
        autocombustion: 0.0,
        fire_spread: 0.0,
        regrowth: 0.0,
    };
    let mut world = forested_world(&[(0, 1), (0, 2), (0, 3)], params);
    world.ignite(PatchId::new(2)).unwrap();
    world.add_firefighter(Firefighter::new(0.0, PatchId::new(0)));

    let mut engine = engine_with(11, params);
    engine.run(&mut world, 1).unwrap();

    let firefighter = &world.firefighters()[0];
    assert_eq!(firefighter.current_patch, PatchId::new(2));
    assert_eq!(firefighter.health, 90.0);
}
