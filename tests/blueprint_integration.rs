//! Blueprint lifecycle integration tests: placement through conversion

use ares_colony::colony::ResourceType;
use ares_colony::core::types::{TilePos, Vec2};
use ares_colony::ecs::World;
use ares_colony::simulation::tick::{run_colony_tick, SimulationEvent};

fn run_until(world: &mut World, max_ticks: u64, mut done: impl FnMut(&World) -> bool) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        events.extend(run_colony_tick(world));
        if done(world) {
            break;
        }
    }
    events
}

#[test]
fn test_colony_builds_solar_panel_end_to_end() {
    let mut world = World::new(11);
    world.spawn_robot(Vec2::new(0.0, 0.0));
    world.spawn_robot(Vec2::new(0.0, 40.0));
    let silicon = world.spawn_node(Vec2::new(80.0, 0.0), ResourceType::Silicon, 200);
    let iron = world.spawn_node(Vec2::new(80.0, 40.0), ResourceType::Iron, 100);

    let starting_money = world.ledger.money();
    let bp_id = world
        .blueprints
        .handle_item_placed("solar panel", Vec2::new(160.0, 0.0), 0, &mut world.ledger)
        .expect("placement affordable")
        .id();

    let events = run_until(&mut world, 3_000, |w| w.blueprints.buildings().len() == 1);

    // Blueprint converted, placement fee charged, nothing refunded
    assert!(world.blueprints.get(bp_id).is_none());
    assert_eq!(world.blueprints.buildings().len(), 1);
    assert_eq!(world.ledger.money(), starting_money - 50);

    // Exactly the outstanding amounts were harvested: 20 silicon, 5 iron
    assert_eq!(world.nodes.get(silicon).unwrap().amount, 180);
    assert_eq!(world.nodes.get(iron).unwrap().amount, 95);

    assert!(events
        .iter()
        .any(|e| matches!(e, SimulationEvent::BuildingCompleted { blueprint, .. } if *blueprint == bp_id)));

    // Both robots end up free for new work
    run_until(&mut world, 200, |w| w.robots.iter().all(|r| r.is_available()));
    assert!(world.robots.iter().all(|r| r.is_available()));
}

#[test]
fn test_habitat_builds_then_expands() {
    let mut world = World::new(12);
    world.spawn_robot(Vec2::new(0.0, 0.0));
    world.spawn_node(Vec2::new(60.0, 0.0), ResourceType::Steel, 200);
    world.spawn_node(Vec2::new(60.0, 30.0), ResourceType::Oxygen, 100);

    let now = world.current_tick;
    world
        .blueprints
        .handle_habitat_placed(
            vec![TilePos::new(0, 0), TilePos::new(1, 0)],
            None,
            Vec2::new(16.0, 16.0),
            now,
            &mut world.ledger,
        )
        .expect("habitat placement affordable");

    run_until(&mut world, 5_000, |w| w.habitats.len() == 1);
    assert_eq!(world.habitats.len(), 1);
    let habitat_id = world.habitats.iter().next().unwrap().id;
    assert_eq!(world.habitats.get(habitat_id).unwrap().tiles.len(), 2);

    // Expand the existing habitat by one tile
    let now = world.current_tick;
    world
        .blueprints
        .handle_habitat_placed(
            vec![TilePos::new(2, 0)],
            Some(habitat_id),
            Vec2::new(80.0, 16.0),
            now,
            &mut world.ledger,
        )
        .expect("expansion placement affordable");

    run_until(&mut world, 5_000, |w| {
        w.habitats
            .get(habitat_id)
            .map(|h| h.tiles.len() == 3)
            .unwrap_or(false)
    });

    let habitat = world.habitats.get(habitat_id).unwrap();
    assert_eq!(habitat.tiles.len(), 3);
    // Still one habitat: the expansion merged instead of splitting
    assert_eq!(world.habitats.len(), 1);
    // The middle tile keeps walls only on its open sides
    assert_eq!(habitat.walls(TilePos::new(1, 0)).len(), 2);
}

#[test]
fn test_cancellation_sinks_delivered_resources() {
    let mut world = World::new(13);
    let starting_money = world.ledger.money();
    let bp_id = world
        .blueprints
        .handle_item_placed("solar panel", Vec2::new(100.0, 0.0), 0, &mut world.ledger)
        .unwrap()
        .id();

    // Partial delivery straight into the blueprint
    world
        .blueprints
        .get_mut(bp_id)
        .unwrap()
        .add_resource(ResourceType::Silicon, 10, 0);

    assert!(world.blueprints.handle_blueprint_canceled(bp_id));
    let World {
        jobs,
        robots,
        nodes,
        ..
    } = &mut world;
    jobs.cancel_jobs_for_blueprint(bp_id, robots, nodes);

    run_until(&mut world, 200, |_| false);

    // No building, no refund of money or delivered units
    assert!(world.blueprints.get(bp_id).is_none());
    assert_eq!(world.blueprints.buildings().len(), 0);
    assert_eq!(world.ledger.money(), starting_money - 50);
    assert_eq!(world.nodes.iter().count(), 0);
    assert_eq!(world.ledger.amount_of(ResourceType::Silicon), 0);
}
