//! Ares Colony - Entry Point
//!
//! Sets up logging and configuration, builds a seeded world with a small
//! starting colony, and drives the simulation either headless for a fixed
//! number of ticks or through an interactive command loop.

use ares_colony::colony::ResourceType;
use ares_colony::core::config::{set_config, SimulationConfig};
use ares_colony::core::error::Result;
use ares_colony::core::types::Vec2;
use ares_colony::ecs::World;
use ares_colony::robots::MiningArea;
use ares_colony::simulation::tick::run_colony_tick;

use clap::Parser;
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "ares-colony", about = "Mars colony simulation core")]
struct Args {
    /// RNG seed for reproducible runs
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run this many ticks headless and exit
    #[arg(long)]
    ticks: Option<u64>,

    /// Path to a TOML simulation config
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("ares_colony=debug")
        .init();

    let args = Args::parse();
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)?;
        if set_config(SimulationConfig::from_toml_str(&raw)?).is_err() {
            tracing::warn!("config already initialized, ignoring {}", path.display());
        }
    }

    tracing::info!("Ares Colony starting (seed {})", args.seed);

    let mut world = World::new(args.seed);
    spawn_initial_colony(&mut world);

    if let Some(ticks) = args.ticks {
        for _ in 0..ticks {
            run_colony_tick(&mut world);
        }
        display_status(&world);
        return Ok(());
    }

    println!("\n=== ARES COLONY ===");
    println!("Resource, construction and defense simulation");
    println!();
    println!("Commands:");
    println!("  tick / t                      - Advance simulation by one tick");
    println!("  run <n>                       - Run n simulation ticks");
    println!("  place <building> <x> <y>      - Place a building or blueprint");
    println!("  node <resource> <amt> <x> <y> - Drop a resource node");
    println!("  alien <x> <y>                 - Spawn an alien");
    println!("  turret <x> <y>                - Spawn a turret");
    println!("  status / s                    - Show detailed status");
    println!("  quit / q                      - Exit");
    println!();

    loop {
        display_status(&world);
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "tick" || input == "t" {
            let events = run_colony_tick(&mut world);
            println!("Tick {} complete ({} events).", world.current_tick, events.len());
            continue;
        }
        if input == "status" || input == "s" {
            display_detailed_status(&world);
            continue;
        }
        if let Some(rest) = input.strip_prefix("run ") {
            match rest.parse::<u64>() {
                Ok(n) => {
                    for _ in 0..n {
                        run_colony_tick(&mut world);
                    }
                    println!("Completed {} ticks. Now at tick {}.", n, world.current_tick);
                }
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }
        if let Some(rest) = input.strip_prefix("place ") {
            handle_place(&mut world, rest);
            continue;
        }
        if let Some(rest) = input.strip_prefix("node ") {
            handle_node(&mut world, rest);
            continue;
        }
        if let Some(rest) = input.strip_prefix("alien ") {
            if let Some(pos) = parse_position(rest) {
                let id = world.spawn_alien(pos);
                println!("Spawned alien {:?}", id);
            } else {
                println!("Usage: alien <x> <y>");
            }
            continue;
        }
        if let Some(rest) = input.strip_prefix("turret ") {
            if let Some(pos) = parse_position(rest) {
                let id = world.spawn_turret(pos);
                println!("Spawned turret {:?}", id);
            } else {
                println!("Usage: turret <x> <y>");
            }
            continue;
        }
        println!("Unknown command. Available: tick, run <n>, place, node, alien, turret, status, quit");
    }

    println!(
        "\nFinal state: {} buildings, {} blueprints, tick {}.",
        world.blueprints.buildings().len(),
        world.blueprints.blueprint_count(),
        world.current_tick
    );
    Ok(())
}

/// A few robots, a mining drone, and some ground resources to start from
fn spawn_initial_colony(world: &mut World) {
    for i in 0..3 {
        world.spawn_robot(Vec2::new(i as f32 * 40.0, 0.0));
    }
    let area = MiningArea::new(Vec2::new(-400.0, 200.0), Vec2::new(-200.0, 400.0));
    world.spawn_drone(Vec2::new(-300.0, 300.0), area, ResourceType::Iron);

    world.spawn_node(Vec2::new(150.0, 100.0), ResourceType::Silicon, 200);
    world.spawn_node(Vec2::new(200.0, -80.0), ResourceType::Iron, 300);
    world.spawn_node(Vec2::new(-120.0, 60.0), ResourceType::Water, 150);
    tracing::info!("Initial colony spawned");
}

fn handle_place(world: &mut World, rest: &str) {
    // Building names can contain spaces; the last two fields are coordinates
    let parts: Vec<&str> = rest.rsplitn(3, ' ').collect();
    if parts.len() != 3 {
        println!("Usage: place <building> <x> <y>");
        return;
    }
    let (y, x, name) = (parts[0], parts[1], parts[2]);
    let (Ok(x), Ok(y)) = (x.parse::<f32>(), y.parse::<f32>()) else {
        println!("Usage: place <building> <x> <y>");
        return;
    };
    let now = world.current_tick;
    let World {
        blueprints, ledger, ..
    } = world;
    match blueprints.handle_item_placed(name, Vec2::new(x, y), now, ledger) {
        Some(placed) => println!("Placed {} -> {:?}", name, placed.id()),
        None => println!("Cannot afford {}", name),
    }
}

fn handle_node(world: &mut World, rest: &str) {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() != 4 {
        println!("Usage: node <resource> <amount> <x> <y>");
        return;
    }
    let Some(resource) = parse_resource(parts[0]) else {
        println!("Unknown resource '{}'", parts[0]);
        return;
    };
    let (Ok(amount), Ok(x), Ok(y)) = (
        parts[1].parse::<u32>(),
        parts[2].parse::<f32>(),
        parts[3].parse::<f32>(),
    ) else {
        println!("Usage: node <resource> <amount> <x> <y>");
        return;
    };
    let id = world.spawn_node(Vec2::new(x, y), resource, amount);
    println!("Dropped {} {} -> {:?}", amount, parts[0], id);
}

fn parse_resource(name: &str) -> Option<ResourceType> {
    match name.to_lowercase().as_str() {
        "iron" => Some(ResourceType::Iron),
        "water" => Some(ResourceType::Water),
        "silicon" => Some(ResourceType::Silicon),
        "oxygen" => Some(ResourceType::Oxygen),
        "concrete" => Some(ResourceType::Concrete),
        "steel" => Some(ResourceType::Steel),
        "food" => Some(ResourceType::Food),
        _ => None,
    }
}

fn parse_position(rest: &str) -> Option<Vec2> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }
    Some(Vec2::new(
        parts[0].parse().ok()?,
        parts[1].parse().ok()?,
    ))
}

/// Brief one-line status
fn display_status(world: &World) {
    println!();
    println!(
        "--- Tick {} | Credits: {} | Blueprints: {} | Buildings: {} | Enemies: {} ---",
        world.current_tick,
        world.ledger.money(),
        world.blueprints.blueprint_count(),
        world.blueprints.buildings().len(),
        world.enemies.len(),
    );
}

/// Full status dump
fn display_detailed_status(world: &World) {
    display_status(world);
    println!("Robots:");
    for robot in &world.robots {
        println!(
            "  {:?} at ({:.0}, {:.0}) [{:?}]{}",
            robot.id,
            robot.position.x,
            robot.position.y,
            robot.state(),
            if robot.alive { "" } else { " DEAD" },
        );
    }
    println!("Drones:");
    for drone in &world.drones {
        println!(
            "  {:?} at ({:.0}, {:.0}) [{:?}] carrying {}",
            drone.id,
            drone.position.x,
            drone.position.y,
            drone.state(),
            drone.carrying,
        );
    }
    println!("Nodes:");
    for node in world.nodes.iter() {
        println!(
            "  {:?} {} x{} at ({:.0}, {:.0})",
            node.id,
            node.resource_type.display_name(),
            node.amount,
            node.position.x,
            node.position.y,
        );
    }
    println!("Blueprints:");
    for blueprint in world.blueprints.iter() {
        println!(
            "  {:?} {:?} [{:?}] {:.0}%",
            blueprint.id,
            blueprint.kind,
            blueprint.state(),
            blueprint.progress() * 100.0,
        );
    }
    println!("Jobs in flight: {}", world.jobs.jobs().len());
}
