//! Autonomous colony robots
//!
//! All robots share a small polled state machine (idle, moving, working,
//! returning) and straight-line movement: a unit direction vector scaled
//! by speed, no pathfinding.

pub mod drone;
pub mod optimus;

pub use drone::{DroneOutcome, MiningArea, MiningDrone};
pub use optimus::{DeliveryOutcome, Optimus, RobotTask};

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Robot state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotState {
    Idle,
    Moving,
    Working,
    Returning,
}

/// Advance a position one tick toward a target in a straight line
pub fn step_toward(position: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let to_target = target - position;
    if to_target.length() <= speed {
        return target;
    }
    position + to_target.normalize() * speed
}

/// Whether a position counts as having arrived at a target
pub fn has_reached(position: Vec2, target: Vec2, threshold: f32) -> bool {
    position.distance(&target) < threshold
}
