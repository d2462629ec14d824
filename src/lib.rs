//! Ares Colony - Mars Colony Simulation Core

pub mod colony;
pub mod core;
pub mod defense;
pub mod ecs;
pub mod robots;
pub mod simulation;
pub mod spatial;
