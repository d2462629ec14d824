//! Colony defense: enemies, turrets, and the targeting layer

pub mod enemy;
pub mod targeting;
pub mod turret;

pub use enemy::{Alien, EnemyAction, EnemyState};
pub use targeting::{TargetKind, TargetRef, TargetRegistry, Targetable, Vitals};
pub use turret::{Turret, TurretShot};
