//! Building catalog - static definitions of everything the colony can place

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Tick;

use super::resources::ResourceType;

/// Kind of building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Habitat,
    SolarPanel,
    OxygenGenerator,
    WaterExtractor,
    Greenhouse,
    TurretMount,
    StorageDepot,
    /// Fallback for unrecognized placement requests
    Generic,
}

/// How a definition enters the world when placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Placed as a blueprint that must collect resources and be built
    Blueprint,
    /// Placed directly as a finished building
    Instant,
}

/// Immutable reference data for one building kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDefinition {
    pub kind: BuildingKind,
    pub display_name: String,
    /// Resources a blueprint must collect before construction can start
    pub cost: Vec<(ResourceType, u32)>,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Ticks of construction once all resources are delivered
    pub build_effort: Tick,
    /// Money charged at placement time (0 = free)
    pub money_cost: u32,
    pub placement: Placement,
    /// Storage depots accept drone deposits into a typed inventory
    pub has_inventory: bool,
}

/// Catalog of all building definitions, keyed by kind and by string id
#[derive(Debug, Clone)]
pub struct BuildingCatalog {
    definitions: AHashMap<BuildingKind, BuildingDefinition>,
    by_name: AHashMap<String, BuildingKind>,
}

impl BuildingCatalog {
    pub fn new() -> Self {
        Self {
            definitions: AHashMap::new(),
            by_name: AHashMap::new(),
        }
    }

    /// Catalog with the standard colony building set
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register(BuildingDefinition {
            kind: BuildingKind::Habitat,
            display_name: "Habitat".into(),
            cost: vec![(ResourceType::Steel, 30), (ResourceType::Oxygen, 10)],
            tile_width: 2,
            tile_height: 2,
            build_effort: 200,
            money_cost: 150,
            placement: Placement::Blueprint,
            has_inventory: false,
        });
        catalog.register(BuildingDefinition {
            kind: BuildingKind::SolarPanel,
            display_name: "Solar Panel".into(),
            cost: vec![(ResourceType::Silicon, 20), (ResourceType::Iron, 5)],
            tile_width: 1,
            tile_height: 1,
            build_effort: 80,
            money_cost: 50,
            placement: Placement::Blueprint,
            has_inventory: false,
        });
        catalog.register(BuildingDefinition {
            kind: BuildingKind::OxygenGenerator,
            display_name: "Oxygen Generator".into(),
            cost: vec![(ResourceType::Iron, 25), (ResourceType::Water, 10)],
            tile_width: 2,
            tile_height: 1,
            build_effort: 150,
            money_cost: 100,
            placement: Placement::Blueprint,
            has_inventory: false,
        });
        catalog.register(BuildingDefinition {
            kind: BuildingKind::WaterExtractor,
            display_name: "Water Extractor".into(),
            cost: vec![(ResourceType::Iron, 20), (ResourceType::Silicon, 10)],
            tile_width: 2,
            tile_height: 2,
            build_effort: 150,
            money_cost: 100,
            placement: Placement::Blueprint,
            has_inventory: false,
        });
        catalog.register(BuildingDefinition {
            kind: BuildingKind::Greenhouse,
            display_name: "Greenhouse".into(),
            cost: vec![
                (ResourceType::Steel, 15),
                (ResourceType::Water, 20),
                (ResourceType::Silicon, 5),
            ],
            tile_width: 3,
            tile_height: 2,
            build_effort: 250,
            money_cost: 200,
            placement: Placement::Blueprint,
            has_inventory: false,
        });
        catalog.register(BuildingDefinition {
            kind: BuildingKind::TurretMount,
            display_name: "Turret Mount".into(),
            cost: vec![(ResourceType::Steel, 20), (ResourceType::Iron, 10)],
            tile_width: 1,
            tile_height: 1,
            build_effort: 100,
            money_cost: 120,
            placement: Placement::Blueprint,
            has_inventory: false,
        });
        catalog.register(BuildingDefinition {
            kind: BuildingKind::StorageDepot,
            display_name: "Storage Depot".into(),
            cost: vec![],
            tile_width: 2,
            tile_height: 2,
            build_effort: 0,
            money_cost: 80,
            placement: Placement::Instant,
            has_inventory: true,
        });
        catalog.register(Self::generic_definition());
        catalog
    }

    fn generic_definition() -> BuildingDefinition {
        BuildingDefinition {
            kind: BuildingKind::Generic,
            display_name: "Structure".into(),
            cost: vec![(ResourceType::Iron, 10)],
            tile_width: 1,
            tile_height: 1,
            build_effort: 100,
            money_cost: 0,
            placement: Placement::Blueprint,
            has_inventory: false,
        }
    }

    pub fn register(&mut self, definition: BuildingDefinition) {
        self.by_name
            .insert(definition.display_name.to_lowercase(), definition.kind);
        self.definitions.insert(definition.kind, definition);
    }

    pub fn get(&self, kind: BuildingKind) -> Option<&BuildingDefinition> {
        self.definitions.get(&kind)
    }

    /// Resolve a placement request by string id
    ///
    /// Unknown ids resolve to the generic 1x1 definition; the anomaly is
    /// logged rather than failing the placement.
    pub fn resolve(&self, name: &str) -> &BuildingDefinition {
        let kind = self.by_name.get(&name.to_lowercase()).copied();
        match kind.and_then(|k| self.definitions.get(&k)) {
            Some(def) => def,
            None => {
                tracing::warn!("unknown building kind '{}', using generic fallback", name);
                self.definitions
                    .get(&BuildingKind::Generic)
                    .expect("generic definition always registered")
            }
        }
    }
}

impl Default for BuildingCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
