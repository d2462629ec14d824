//! Alien enemies - ranged attackers with a standoff distance
//!
//! An alien scans for the closest live target, closes to its preferred
//! shooting distance (not all the way in), and fires on a cooldown while
//! within attack range. Movement steps through the tile occupancy map
//! one tile at a time; a taken destination tile halts the alien for the
//! tick instead of letting two enemies share a tile.

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{EntityId, Tick, TilePos, Vec2};
use crate::robots::step_toward;
use crate::spatial::TileOccupancy;

use super::targeting::{TargetRef, TargetRegistry, Vitals};

/// Enemy state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Attacking,
    /// Terminal until corpse despawn
    Dead,
}

/// Side effects of one alien update, applied by the orchestrator
#[derive(Debug, Clone)]
pub enum EnemyAction {
    Attacked {
        enemy: EntityId,
        target: TargetRef,
        damage: f32,
    },
    /// Corpse delay elapsed; remove the alien and its tile claims
    Despawn { enemy: EntityId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub id: EntityId,
    pub position: Vec2,
    pub speed: f32,
    pub vitals: Vitals,
    state: EnemyState,
    target: Option<TargetRef>,
    last_attack_tick: Option<Tick>,
    despawn_at: Option<Tick>,
}

impl Alien {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            position,
            speed: config().alien_speed,
            vitals: Vitals::new(50.0),
            state: EnemyState::Idle,
            target: None,
            last_attack_tick: None,
            despawn_at: None,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn target(&self) -> Option<TargetRef> {
        self.target
    }

    pub fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }

    pub fn tile(&self) -> TilePos {
        TilePos::from_world(self.position, config().tile_size)
    }

    /// Apply incoming damage. Death transitions exactly once and starts
    /// the corpse despawn timer.
    pub fn take_damage(&mut self, amount: f32, now: Tick) -> bool {
        if self.state == EnemyState::Dead {
            return false;
        }
        if self.vitals.apply_damage(amount) {
            self.state = EnemyState::Dead;
            self.target = None;
            self.despawn_at = Some(now + config().corpse_despawn_delay);
            tracing::debug!("alien {:?} killed", self.id);
            return true;
        }
        false
    }

    /// Advance the state machine one tick
    pub fn update(
        &mut self,
        now: Tick,
        targets: &TargetRegistry,
        occupancy: &mut TileOccupancy,
    ) -> Option<EnemyAction> {
        let cfg = config();

        match self.state {
            EnemyState::Dead => {
                if self.despawn_at.map(|t| now >= t).unwrap_or(false) {
                    occupancy.release_all_of(self.id);
                    return Some(EnemyAction::Despawn { enemy: self.id });
                }
                None
            }
            EnemyState::Idle => {
                if let Some(found) =
                    targets.closest_within(self.position, cfg.alien_detection_range)
                {
                    self.target = Some(found.target);
                    self.state = EnemyState::Attacking;
                }
                None
            }
            EnemyState::Attacking => {
                // A target missing from the snapshot is dead or gone
                let Some(target_ref) = self.target else {
                    self.state = EnemyState::Idle;
                    return None;
                };
                let Some(target_pos) = targets.position_of(target_ref) else {
                    self.target = None;
                    self.state = EnemyState::Idle;
                    return None;
                };

                let distance = self.position.distance(&target_pos);
                if distance > cfg.preferred_shooting_distance {
                    self.step_through_tiles(target_pos, occupancy);
                }

                if distance <= cfg.alien_attack_range && self.cooldown_elapsed(now) {
                    self.last_attack_tick = Some(now);
                    return Some(EnemyAction::Attacked {
                        enemy: self.id,
                        target: target_ref,
                        damage: cfg.alien_attack_damage,
                    });
                }
                None
            }
        }
    }

    fn cooldown_elapsed(&self, now: Tick) -> bool {
        self.last_attack_tick
            .map(|last| now.saturating_sub(last) >= config().alien_attack_cooldown)
            .unwrap_or(true)
    }

    /// Straight-line step, gated by tile occupancy. Crossing into a tile
    /// held by another entity halts the alien in place for this tick.
    fn step_through_tiles(&mut self, target_pos: Vec2, occupancy: &mut TileOccupancy) {
        let tile_size = config().tile_size;
        let next = step_toward(self.position, target_pos, self.speed);
        let current_tile = TilePos::from_world(self.position, tile_size);
        let next_tile = TilePos::from_world(next, tile_size);

        if next_tile == current_tile {
            self.position = next;
        } else if occupancy.move_occupant(current_tile, next_tile, self.id) {
            self.position = next;
        }
    }
}
