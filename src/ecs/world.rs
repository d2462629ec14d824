//! World - explicitly owned simulation state
//!
//! Everything mutable lives here and is passed by reference into each
//! subsystem's update. No engine-scoped singletons; the only ambient
//! state is the read-only simulation config.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::colony::{
    BlueprintManager, BuildingCatalog, HabitatManager, JobManager, NodeRegistry, ResourceLedger,
    ResourceNode, ResourceType,
};
use crate::core::config::config;
use crate::core::types::{EntityId, Tick, Vec2};
use crate::defense::{Alien, TargetRegistry, Targetable, Turret, Vitals};
use crate::robots::{MiningArea, MiningDrone, Optimus};
use crate::spatial::TileOccupancy;

/// The player avatar. Carries a recharging-style shield layer that
/// absorbs damage before health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub position: Vec2,
    pub vitals: Vitals,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            position,
            vitals: Vitals::with_shield(100.0, 50.0),
        }
    }
}

impl Targetable for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    fn take_damage(&mut self, amount: f32) -> bool {
        self.vitals.apply_damage(amount)
    }
}

/// All simulation state, owned in one place
pub struct World {
    pub current_tick: Tick,
    pub ledger: ResourceLedger,
    pub nodes: NodeRegistry,
    pub blueprints: BlueprintManager,
    pub jobs: JobManager,
    pub habitats: HabitatManager,
    pub robots: Vec<Optimus>,
    pub drones: Vec<MiningDrone>,
    pub player: Player,
    pub enemies: Vec<Alien>,
    pub turrets: Vec<Turret>,
    pub occupancy: TileOccupancy,
    pub targets: TargetRegistry,
    pub rng: ChaCha8Rng,
}

impl World {
    /// Seeded construction keeps runs reproducible
    pub fn new(seed: u64) -> Self {
        Self {
            current_tick: 0,
            ledger: ResourceLedger::with_money(config().starting_money),
            nodes: NodeRegistry::new(),
            blueprints: BlueprintManager::new(BuildingCatalog::with_defaults()),
            jobs: JobManager::new(),
            habitats: HabitatManager::new(),
            robots: Vec::new(),
            drones: Vec::new(),
            player: Player::new(Vec2::default()),
            enemies: Vec::new(),
            turrets: Vec::new(),
            occupancy: TileOccupancy::new(),
            targets: TargetRegistry::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn spawn_robot(&mut self, home: Vec2) -> EntityId {
        let robot = Optimus::new(home);
        let id = robot.id;
        self.robots.push(robot);
        id
    }

    pub fn spawn_drone(
        &mut self,
        position: Vec2,
        area: MiningArea,
        resource: ResourceType,
    ) -> EntityId {
        let drone = MiningDrone::new(position, area, resource);
        let id = drone.id;
        self.drones.push(drone);
        id
    }

    pub fn spawn_node(
        &mut self,
        position: Vec2,
        resource: ResourceType,
        amount: u32,
    ) -> EntityId {
        self.nodes.insert(ResourceNode::new(position, resource, amount))
    }

    /// Spawns an alien and claims its starting tile
    pub fn spawn_alien(&mut self, position: Vec2) -> EntityId {
        let alien = Alien::new(position);
        let id = alien.id;
        self.occupancy.try_claim(alien.tile(), id);
        self.enemies.push(alien);
        id
    }

    pub fn spawn_turret(&mut self, position: Vec2) -> EntityId {
        let turret = Turret::new(position);
        let id = turret.id;
        self.turrets.push(turret);
        id
    }

    pub fn robot(&self, id: EntityId) -> Option<&Optimus> {
        self.robots.iter().find(|r| r.id == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Alien> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
