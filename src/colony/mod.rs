//! Colony economy: resources, nodes, blueprints, buildings, habitats, jobs

pub mod blueprint;
pub mod building;
pub mod catalog;
pub mod habitat;
pub mod jobs;
pub mod manager;
pub mod node;
pub mod resources;

pub use blueprint::{Blueprint, BlueprintState, CompletionPayload, Requirement};
pub use building::{Building, BuildingRegistry};
pub use catalog::{BuildingCatalog, BuildingDefinition, BuildingKind, Placement};
pub use habitat::{Habitat, HabitatManager, Side};
pub use jobs::{DeliveryJob, JobManager};
pub use manager::{BlueprintManager, ConvertedBuilding, PlacedItem};
pub use node::{NodeRegistry, ResourceNode};
pub use resources::{ResourceLedger, ResourceType};
