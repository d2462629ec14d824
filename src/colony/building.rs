//! Finished buildings and the live building collection

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Tick, TilePos, Vec2};

use super::catalog::BuildingKind;
use super::resources::ResourceType;

/// A completed, operational building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: EntityId,
    pub kind: BuildingKind,
    pub position: Vec2,
    pub tile_width: u32,
    pub tile_height: u32,
    pub completed_tick: Tick,
    /// Typed storage for depots; `None` for buildings without storage
    pub inventory: Option<AHashMap<ResourceType, u32>>,
    /// Set when this building belongs to a multi-tile habitat
    pub habitat_id: Option<EntityId>,
}

impl Building {
    pub fn new(
        kind: BuildingKind,
        position: Vec2,
        tile_width: u32,
        tile_height: u32,
        completed_tick: Tick,
        has_inventory: bool,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            position,
            tile_width,
            tile_height,
            completed_tick,
            inventory: has_inventory.then(AHashMap::new),
            habitat_id: None,
        }
    }

    /// Store units in this building's inventory, returns amount accepted
    /// (0 when the building has no storage)
    pub fn store(&mut self, resource: ResourceType, amount: u32) -> u32 {
        match &mut self.inventory {
            Some(inventory) => {
                *inventory.entry(resource).or_insert(0) += amount;
                amount
            }
            None => 0,
        }
    }

    /// Whether this building's footprint covers a tile
    pub fn covers(&self, tile: TilePos, tile_size: f32) -> bool {
        let origin = TilePos::from_world(self.position, tile_size);
        tile.x >= origin.x
            && tile.x < origin.x + self.tile_width as i32
            && tile.y >= origin.y
            && tile.y < origin.y + self.tile_height as i32
    }

    pub fn stored(&self, resource: ResourceType) -> u32 {
        self.inventory
            .as_ref()
            .and_then(|inv| inv.get(&resource))
            .copied()
            .unwrap_or(0)
    }
}

/// Collection of all completed buildings
#[derive(Debug, Clone, Default)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    by_id: AHashMap<EntityId, usize>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn insert(&mut self, building: Building) -> EntityId {
        let id = building.id;
        self.by_id.insert(id, self.buildings.len());
        self.buildings.push(building);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Building> {
        self.by_id.get(&id).map(|&i| &self.buildings[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Building> {
        self.by_id.get(&id).map(|&i| &mut self.buildings[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Building> {
        self.buildings.iter_mut()
    }

    pub fn iter_of_kind(&self, kind: BuildingKind) -> impl Iterator<Item = &Building> + '_ {
        self.buildings.iter().filter(move |b| b.kind == kind)
    }

    /// Demolish a building, returns whether it existed
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(&index) = self.by_id.get(&id) else {
            return false;
        };
        self.buildings.remove(index);
        self.by_id.clear();
        for (i, building) in self.buildings.iter().enumerate() {
            self.by_id.insert(building.id, i);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_requires_inventory() {
        let mut depot = Building::new(
            BuildingKind::StorageDepot,
            Vec2::default(),
            2,
            2,
            0,
            true,
        );
        assert_eq!(depot.store(ResourceType::Iron, 15), 15);
        assert_eq!(depot.stored(ResourceType::Iron), 15);

        let mut panel = Building::new(
            BuildingKind::SolarPanel,
            Vec2::default(),
            1,
            1,
            0,
            false,
        );
        assert_eq!(panel.store(ResourceType::Iron, 15), 0);
        assert_eq!(panel.stored(ResourceType::Iron), 0);
    }

    #[test]
    fn test_registry_insert_remove() {
        let mut registry = BuildingRegistry::new();
        let a = registry.insert(Building::new(
            BuildingKind::SolarPanel,
            Vec2::new(0.0, 0.0),
            1,
            1,
            0,
            false,
        ));
        let b = registry.insert(Building::new(
            BuildingKind::Habitat,
            Vec2::new(64.0, 0.0),
            2,
            2,
            0,
            false,
        ));

        assert_eq!(registry.len(), 2);
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(registry.get(a).is_none());
        // Index map stays consistent after removal
        assert_eq!(registry.get(b).unwrap().kind, BuildingKind::Habitat);
    }

    #[test]
    fn test_iter_of_kind() {
        let mut registry = BuildingRegistry::new();
        registry.insert(Building::new(
            BuildingKind::SolarPanel,
            Vec2::default(),
            1,
            1,
            0,
            false,
        ));
        registry.insert(Building::new(
            BuildingKind::SolarPanel,
            Vec2::default(),
            1,
            1,
            0,
            false,
        ));
        registry.insert(Building::new(
            BuildingKind::Habitat,
            Vec2::default(),
            2,
            2,
            0,
            false,
        ));
        assert_eq!(registry.iter_of_kind(BuildingKind::SolarPanel).count(), 2);
    }
}
