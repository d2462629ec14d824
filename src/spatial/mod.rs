//! Spatial bookkeeping for ground movement

pub mod occupancy;

pub use occupancy::TileOccupancy;
