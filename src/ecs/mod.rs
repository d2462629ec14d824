//! Owned simulation state

pub mod world;

pub use world::{Player, World};
