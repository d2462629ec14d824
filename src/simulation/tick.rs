//! Tick orchestrator - one simulation step over the whole world
//!
//! Within-tick ordering is fixed: job matching, robot and drone updates
//! (resource accumulation), blueprint progress and conversion, enemy and
//! turret combat, then cleanup sweeps. A blueprint therefore always sees
//! deliveries made this tick before its completion check runs, so no
//! delivery is lost to a same-tick conversion.

use crate::colony::{BlueprintState, BuildingRegistry, ResourceType};
use crate::core::config::config;
use crate::core::types::{EntityId, TilePos, Vec2};
use crate::defense::{EnemyAction, TargetKind, TargetRef, Targetable};
use crate::ecs::World;
use crate::robots::{DeliveryOutcome, DroneOutcome};

/// Everything observable that happened during one tick
#[derive(Debug, Clone)]
pub enum SimulationEvent {
    JobAssigned {
        job: EntityId,
        robot: EntityId,
        blueprint: EntityId,
        resource: ResourceType,
        amount: u32,
    },
    ResourcePickedUp {
        robot: EntityId,
        node: EntityId,
        resource: ResourceType,
        amount: u32,
    },
    ResourceDelivered {
        robot: EntityId,
        blueprint: EntityId,
        resource: ResourceType,
        accepted: u32,
        leftover: u32,
    },
    DroneDeposited {
        drone: EntityId,
        resource: ResourceType,
        amount: u32,
    },
    /// All requirements met; construction began this tick
    ConstructionStarted {
        blueprint: EntityId,
    },
    BuildingCompleted {
        blueprint: EntityId,
        building: EntityId,
    },
    NodeDepleted {
        node: EntityId,
    },
    EnemyAttacked {
        enemy: EntityId,
        target: TargetRef,
        damage: f32,
    },
    TargetKilled {
        target: TargetRef,
    },
    TurretFired {
        turret: EntityId,
        target: EntityId,
        hit: bool,
    },
    EnemyKilled {
        enemy: EntityId,
    },
    EnemyDespawned {
        enemy: EntityId,
    },
}

/// Run one full simulation tick and advance the clock
pub fn run_colony_tick(world: &mut World) -> Vec<SimulationEvent> {
    let now = world.current_tick;
    let mut events = Vec::new();

    // 1. Match unmet blueprint requirements to nodes and robots
    let assigned =
        world
            .jobs
            .create_delivery_jobs(&world.blueprints, &world.nodes, &mut world.robots);
    for job in assigned {
        events.push(SimulationEvent::JobAssigned {
            job: job.id,
            robot: job.robot,
            blueprint: job.blueprint,
            resource: job.resource,
            amount: job.amount,
        });
    }

    // 2. Robots haul, drones mine; deliveries land before completion checks
    let mut delivered_to = Vec::new();
    for robot in &mut world.robots {
        for outcome in robot.update(now, &mut world.nodes, &mut world.blueprints) {
            if let DeliveryOutcome::Delivered {
                blueprint,
                accepted,
                ..
            } = &outcome
            {
                if *accepted > 0 && !delivered_to.contains(blueprint) {
                    delivered_to.push(*blueprint);
                }
            }
            events.push(match outcome {
                DeliveryOutcome::PickedUp {
                    robot,
                    node,
                    resource,
                    amount,
                } => SimulationEvent::ResourcePickedUp {
                    robot,
                    node,
                    resource,
                    amount,
                },
                DeliveryOutcome::Delivered {
                    robot,
                    blueprint,
                    resource,
                    accepted,
                    leftover,
                } => SimulationEvent::ResourceDelivered {
                    robot,
                    blueprint,
                    resource,
                    accepted,
                    leftover,
                },
            });
        }
    }

    for drone in &mut world.drones {
        if let Some(DroneOutcome::Deposited {
            drone,
            resource,
            amount,
            position,
        }) = drone.update(now, &mut world.rng, &mut world.ledger)
        {
            credit_depot_at(world.blueprints.buildings_mut(), position, resource, amount);
            events.push(SimulationEvent::DroneDeposited {
                drone,
                resource,
                amount,
            });
        }
    }

    // A delivery that met the final requirement flipped the blueprint
    // into its construction phase this tick
    for blueprint in delivered_to {
        if world
            .blueprints
            .get(blueprint)
            .map(|bp| bp.state() == BlueprintState::Building)
            .unwrap_or(false)
        {
            events.push(SimulationEvent::ConstructionStarted { blueprint });
        }
    }

    // 3. Blueprint progress, then conversion of completed ones
    for converted in world.blueprints.update_blueprints(now, &mut world.habitats) {
        events.push(SimulationEvent::BuildingCompleted {
            blueprint: converted.blueprint,
            building: converted.building,
        });
    }

    // 4. Defense: rebuild the target snapshot, then enemies and turrets
    world.targets.clear();
    world.targets.register(
        TargetRef {
            kind: TargetKind::Player,
            id: world.player.id,
        },
        &world.player,
    );
    for robot in &world.robots {
        world.targets.register(
            TargetRef {
                kind: TargetKind::Robot,
                id: robot.id,
            },
            robot,
        );
    }
    for drone in &world.drones {
        world.targets.register(
            TargetRef {
                kind: TargetKind::Drone,
                id: drone.id,
            },
            drone,
        );
    }

    let mut pending_damage = Vec::new();
    let mut despawned = Vec::new();
    for enemy in &mut world.enemies {
        match enemy.update(now, &world.targets, &mut world.occupancy) {
            Some(EnemyAction::Attacked {
                enemy,
                target,
                damage,
            }) => {
                events.push(SimulationEvent::EnemyAttacked {
                    enemy,
                    target,
                    damage,
                });
                pending_damage.push((target, damage));
            }
            Some(EnemyAction::Despawn { enemy }) => despawned.push(enemy),
            None => {}
        }
    }

    for (target, damage) in pending_damage {
        let killed = match target.kind {
            TargetKind::Player => world.player.take_damage(damage),
            TargetKind::Robot => world
                .robots
                .iter_mut()
                .find(|r| r.id == target.id)
                .map(|r| r.take_damage(damage))
                .unwrap_or(false),
            TargetKind::Drone => world
                .drones
                .iter_mut()
                .find(|d| d.id == target.id)
                .map(|d| d.take_damage(damage))
                .unwrap_or(false),
        };
        if killed {
            tracing::debug!("target {:?} destroyed", target.id);
            events.push(SimulationEvent::TargetKilled { target });
        }
    }

    let mut pending_shots = Vec::new();
    for turret in &mut world.turrets {
        if let Some(shot) = turret.update(now, &world.enemies, &mut world.rng) {
            events.push(SimulationEvent::TurretFired {
                turret: shot.turret,
                target: shot.target,
                hit: shot.hit,
            });
            if shot.hit {
                pending_shots.push(shot);
            }
        }
    }
    for shot in pending_shots {
        if let Some(enemy) = world.enemies.iter_mut().find(|e| e.id == shot.target) {
            if enemy.take_damage(shot.damage, now) {
                events.push(SimulationEvent::EnemyKilled { enemy: shot.target });
            }
        }
    }

    // 5. Cleanup sweeps
    if !despawned.is_empty() {
        world.enemies.retain(|e| !despawned.contains(&e.id));
        for enemy in despawned {
            events.push(SimulationEvent::EnemyDespawned { enemy });
        }
    }
    for node in world.nodes.sweep_depleted() {
        events.push(SimulationEvent::NodeDepleted { node });
    }
    world.jobs.sweep_finished(&world.robots);

    world.current_tick += 1;
    events
}

/// Route a ground deposit into a storage building covering that tile
fn credit_depot_at(
    buildings: &mut BuildingRegistry,
    position: Vec2,
    resource: ResourceType,
    amount: u32,
) {
    let tile = TilePos::from_world(position, config().tile_size);
    if let Some(depot) = buildings
        .iter_mut()
        .find(|b| b.inventory.is_some() && b.covers(tile, config().tile_size))
    {
        depot.store(resource, amount);
    }
}
