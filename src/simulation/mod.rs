//! Tick orchestration and simulation events

pub mod tick;

pub use tick::{run_colony_tick, SimulationEvent};
