//! Targeting capability layer
//!
//! Enemies and turrets never reach into other subsystems' entity lists.
//! Anything shootable implements [`Targetable`]; each tick the orchestrator
//! rebuilds a position snapshot from the live implementors, scanning code
//! reads only the snapshot, and damage flows back as events keyed by a
//! [`TargetRef`] so the owner applies it.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};
use crate::robots::{MiningDrone, Optimus};

/// Which collection owns a targetable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Player,
    Robot,
    Drone,
}

/// Stable handle to a targetable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: EntityId,
}

/// Anything an enemy can scan for and shoot at
pub trait Targetable {
    fn position(&self) -> Vec2;
    fn is_alive(&self) -> bool;
    /// Apply damage; returns true when this call killed the entity
    fn take_damage(&mut self, amount: f32) -> bool;
}

/// Health pool with an optional shield layer.
///
/// Damage depletes the shield first; any remainder carries over to health
/// in the same call. Nothing is lost or double-applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub shield: f32,
}

impl Vitals {
    pub fn new(health: f32) -> Self {
        Self {
            health,
            shield: 0.0,
        }
    }

    pub fn with_shield(health: f32, shield: f32) -> Self {
        Self { health, shield }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Returns true when this call brought health to zero
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        self.health = (self.health - (amount - absorbed)).max(0.0);
        !self.is_alive()
    }
}

/// One live entity's position at snapshot time
#[derive(Debug, Clone, Copy)]
pub struct TargetSnapshot {
    pub target: TargetRef,
    pub position: Vec2,
}

/// Per-tick snapshot of everything shootable
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    entries: Vec<TargetSnapshot>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Register an entity if it is still alive
    pub fn register(&mut self, target: TargetRef, entity: &dyn Targetable) {
        if entity.is_alive() {
            self.entries.push(TargetSnapshot {
                target,
                position: entity.position(),
            });
        }
    }

    /// Linear scan for the closest entry within range
    pub fn closest_within(&self, from: Vec2, range: f32) -> Option<TargetSnapshot> {
        let mut best: Option<(f32, TargetSnapshot)> = None;
        for entry in &self.entries {
            let dist = from.distance(&entry.position);
            if dist > range {
                continue;
            }
            if best.map(|(d, _)| dist < d).unwrap_or(true) {
                best = Some((dist, *entry));
            }
        }
        best.map(|(_, entry)| entry)
    }

    /// A target absent from the snapshot is dead or despawned
    pub fn position_of(&self, target: TargetRef) -> Option<Vec2> {
        self.entries
            .iter()
            .find(|e| e.target == target)
            .map(|e| e.position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Targetable for Optimus {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

impl Targetable for MiningDrone {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}
