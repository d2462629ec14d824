//! Simulation configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other.

use serde::Deserialize;

use crate::core::error::{ColonyError, Result};

/// Configuration for the simulation systems
///
/// These values have been tuned to produce good colony pacing.
/// Changing them affects how quickly bases grow and how dangerous aliens are.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === GRID ===
    /// Side length of one colony tile (world units)
    ///
    /// Tile occupancy, habitat layout, and resource node merging all key
    /// off the tile grid derived from this size.
    pub tile_size: f32,

    // === ROBOTS ===
    /// Distance at which a robot counts as having reached its target
    ///
    /// Robots move in straight lines, so an exact-position check would
    /// oscillate. 10 units is well under half a tile.
    pub reach_threshold: f32,

    /// Worker robot movement speed (world units per tick)
    pub robot_speed: f32,

    /// Ticks an Optimus spends on a generic work step
    pub work_duration: u64,

    /// Mining drone movement speed (world units per tick)
    pub drone_speed: f32,

    /// Ticks a mining drone spends extracting at a mining point
    pub mining_duration: u64,

    /// Units a mining drone collects per mining cycle
    pub drone_capacity: u32,

    // === ALIENS ===
    /// How far an idle alien can spot a target (world units)
    pub alien_detection_range: f32,

    /// Range within which an alien can fire (world units)
    pub alien_attack_range: f32,

    /// Standoff distance: an alien stops advancing once this close
    ///
    /// Must be at most `alien_attack_range`, otherwise the alien would
    /// stop before it is able to fire and stall forever.
    pub preferred_shooting_distance: f32,

    /// Alien movement speed (world units per tick)
    pub alien_speed: f32,

    /// Ticks between consecutive alien attacks
    pub alien_attack_cooldown: u64,

    /// Damage per alien attack
    pub alien_attack_damage: f32,

    /// Ticks a dead alien lingers before it is fully removed
    pub corpse_despawn_delay: u64,

    // === TURRETS ===
    /// Ticks between turret target re-scans
    ///
    /// Scanning is cheaper than firing but still a full linear pass over
    /// live enemies, so it runs on its own cadence.
    pub turret_scan_interval: u64,

    /// Ticks between turret shots (independent of the scan cadence)
    pub turret_fire_cooldown: u64,

    /// How far a turret notices enemies (world units)
    pub turret_detection_range: f32,

    /// Range within which a turret may engage (world units)
    pub turret_attack_range: f32,

    /// Hard ballistic limit on turret shots (world units)
    ///
    /// A target must be inside both `turret_attack_range` and this limit
    /// for the turret to fire.
    pub turret_max_shooting_range: f32,

    /// Radius of the random aim offset applied to each turret shot
    ///
    /// Shots landing further than `tile_size / 2` from the target after
    /// the offset count as misses.
    pub turret_imprecision: f32,

    /// Damage per turret shot that hits
    pub turret_damage: f32,

    // === ECONOMY ===
    /// Starting money for a new colony
    pub starting_money: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,

            reach_threshold: 10.0,
            robot_speed: 4.0,
            work_duration: 20,
            drone_speed: 3.0,
            mining_duration: 30,
            drone_capacity: 10,

            alien_detection_range: 300.0,
            alien_attack_range: 150.0,
            preferred_shooting_distance: 120.0,
            alien_speed: 2.0,
            alien_attack_cooldown: 40,
            alien_attack_damage: 8.0,
            corpse_despawn_delay: 100,

            turret_scan_interval: 25,
            turret_fire_cooldown: 15,
            turret_detection_range: 350.0,
            turret_attack_range: 250.0,
            turret_max_shooting_range: 300.0,
            turret_imprecision: 12.0,
            turret_damage: 12.0,

            starting_money: 1000,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, falling back to defaults for absent keys
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tile_size <= 0.0 {
            return Err(ColonyError::InvalidConfig(
                "tile_size must be positive".into(),
            ));
        }

        if self.preferred_shooting_distance > self.alien_attack_range {
            return Err(ColonyError::InvalidConfig(format!(
                "preferred_shooting_distance ({}) must be <= alien_attack_range ({})",
                self.preferred_shooting_distance, self.alien_attack_range
            )));
        }

        if self.turret_attack_range > self.turret_detection_range {
            return Err(ColonyError::InvalidConfig(format!(
                "turret_attack_range ({}) must be <= turret_detection_range ({})",
                self.turret_attack_range, self.turret_detection_range
            )));
        }

        if self.robot_speed <= 0.0 || self.drone_speed <= 0.0 || self.alien_speed <= 0.0 {
            return Err(ColonyError::InvalidConfig(
                "movement speeds must be positive".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimulationConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimulationConfig {
    CONFIG.get_or_init(SimulationConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimulationConfig) -> std::result::Result<(), SimulationConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_standoff_beyond_attack_range_rejected() {
        let config = SimulationConfig {
            preferred_shooting_distance: 200.0,
            alien_attack_range: 150.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SimulationConfig::from_toml_str("robot_speed = 6.0\n").unwrap();
        assert!((config.robot_speed - 6.0).abs() < 0.001);
        // Absent keys fall back to defaults
        assert!((config.tile_size - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_from_toml_invalid_rejected() {
        let result = SimulationConfig::from_toml_str("tile_size = -1.0\n");
        assert!(result.is_err());
    }
}
