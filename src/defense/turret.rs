//! Stationary defense turrets
//!
//! A turret re-scans for the closest live alien on a fixed interval and
//! fires on its own cooldown, independent of the scan cadence. Each shot
//! lands with a random imprecision offset; an impact point further than
//! half a tile from the target counts as a miss.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{EntityId, Tick, Vec2};

use super::enemy::Alien;

/// A fired shot, applied to the target by the orchestrator when it hits
#[derive(Debug, Clone)]
pub struct TurretShot {
    pub turret: EntityId,
    pub target: EntityId,
    pub impact: Vec2,
    pub hit: bool,
    pub damage: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub id: EntityId,
    pub position: Vec2,
    /// Facing angle in radians, updated toward the current target
    pub rotation: f32,
    target: Option<EntityId>,
    last_scan_tick: Option<Tick>,
    last_fire_tick: Option<Tick>,
}

impl Turret {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            position,
            rotation: 0.0,
            target: None,
            last_scan_tick: None,
            last_fire_tick: None,
        }
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Advance one tick against the current enemy list
    pub fn update(
        &mut self,
        now: Tick,
        enemies: &[Alien],
        rng: &mut impl Rng,
    ) -> Option<TurretShot> {
        let cfg = config();

        if self.scan_due(now) {
            self.last_scan_tick = Some(now);
            self.target = self.closest_enemy(enemies, cfg.turret_detection_range);
        }

        let target_id = self.target?;
        let Some(enemy) = enemies.iter().find(|e| e.id == target_id && e.is_alive()) else {
            self.target = None;
            return None;
        };

        let distance = self.position.distance(&enemy.position);
        if distance > cfg.turret_attack_range || distance > cfg.turret_max_shooting_range {
            return None;
        }

        let to_target = enemy.position - self.position;
        self.rotation = to_target.y.atan2(to_target.x);

        if !self.fire_cooldown_elapsed(now) {
            return None;
        }
        self.last_fire_tick = Some(now);

        let spread = cfg.turret_imprecision;
        let impact = enemy.position
            + Vec2::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
            );
        let hit = impact.distance(&enemy.position) <= cfg.tile_size / 2.0;
        tracing::debug!(
            "turret {:?} fired at alien {:?} (hit: {})",
            self.id,
            target_id,
            hit
        );
        Some(TurretShot {
            turret: self.id,
            target: target_id,
            impact,
            hit,
            damage: cfg.turret_damage,
        })
    }

    fn scan_due(&self, now: Tick) -> bool {
        self.last_scan_tick
            .map(|last| now.saturating_sub(last) >= config().turret_scan_interval)
            .unwrap_or(true)
    }

    fn fire_cooldown_elapsed(&self, now: Tick) -> bool {
        self.last_fire_tick
            .map(|last| now.saturating_sub(last) >= config().turret_fire_cooldown)
            .unwrap_or(true)
    }

    fn closest_enemy(&self, enemies: &[Alien], range: f32) -> Option<EntityId> {
        let mut best: Option<(f32, EntityId)> = None;
        for enemy in enemies.iter().filter(|e| e.is_alive()) {
            let dist = self.position.distance(&enemy.position);
            if dist > range {
                continue;
            }
            if best.map(|(d, _)| dist < d).unwrap_or(true) {
                best = Some((dist, enemy.id));
            }
        }
        best.map(|(_, id)| id)
    }
}
