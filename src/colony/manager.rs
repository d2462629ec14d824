//! Blueprint manager - placement and completion orchestration
//!
//! Owns the live blueprint and building collections. Converting a
//! completed blueprint into a building happens here and nowhere else.

use ahash::AHashMap;

use crate::core::types::{EntityId, Tick, TilePos, Vec2};

use super::blueprint::{Blueprint, BlueprintState};
use super::building::{Building, BuildingRegistry};
use super::catalog::{BuildingCatalog, BuildingKind, Placement};
use super::habitat::HabitatManager;
use super::resources::ResourceLedger;

/// What a placement request produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedItem {
    Blueprint(EntityId),
    Building(EntityId),
}

impl PlacedItem {
    pub fn id(&self) -> EntityId {
        match self {
            PlacedItem::Blueprint(id) | PlacedItem::Building(id) => *id,
        }
    }
}

/// Record of one blueprint -> building conversion
#[derive(Debug, Clone)]
pub struct ConvertedBuilding {
    pub blueprint: EntityId,
    pub building: EntityId,
    pub kind: BuildingKind,
}

/// Placement and completion orchestration over blueprints and buildings
#[derive(Debug, Clone)]
pub struct BlueprintManager {
    catalog: BuildingCatalog,
    blueprints: Vec<Blueprint>,
    by_id: AHashMap<EntityId, usize>,
    buildings: BuildingRegistry,
}

impl BlueprintManager {
    pub fn new(catalog: BuildingCatalog) -> Self {
        Self {
            catalog,
            blueprints: Vec::new(),
            by_id: AHashMap::new(),
            buildings: BuildingRegistry::new(),
        }
    }

    pub fn catalog(&self) -> &BuildingCatalog {
        &self.catalog
    }

    pub fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    pub fn buildings_mut(&mut self) -> &mut BuildingRegistry {
        &mut self.buildings
    }

    pub fn get(&self, id: EntityId) -> Option<&Blueprint> {
        self.by_id.get(&id).map(|&i| &self.blueprints[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Blueprint> {
        self.by_id.get(&id).map(|&i| &mut self.blueprints[i])
    }

    /// Live blueprints, in placement order
    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.iter()
    }

    pub fn blueprint_count(&self) -> usize {
        self.blueprints.len()
    }

    /// Handle a placement request from the UI layer.
    ///
    /// Charges the definition's money cost; an unaffordable placement
    /// returns None and leaves all state unchanged. Unknown kind names
    /// fall back to the generic definition (logged by the catalog).
    pub fn handle_item_placed(
        &mut self,
        kind_name: &str,
        position: Vec2,
        now: Tick,
        ledger: &mut ResourceLedger,
    ) -> Option<PlacedItem> {
        let definition = self.catalog.resolve(kind_name).clone();
        if definition.money_cost > 0 && !ledger.spend_money(definition.money_cost) {
            tracing::debug!(
                "cannot afford {} ({} credits)",
                definition.display_name,
                definition.money_cost
            );
            return None;
        }

        match definition.placement {
            Placement::Instant => {
                let building = Building::new(
                    definition.kind,
                    position,
                    definition.tile_width,
                    definition.tile_height,
                    now,
                    definition.has_inventory,
                );
                let id = self.buildings.insert(building);
                Some(PlacedItem::Building(id))
            }
            Placement::Blueprint => {
                let blueprint = Blueprint::from_definition(&definition, position, now);
                let id = blueprint.id;
                self.by_id.insert(id, self.blueprints.len());
                self.blueprints.push(blueprint);
                Some(PlacedItem::Blueprint(id))
            }
        }
    }

    /// Place a habitat blueprint over an arbitrary tile set.
    ///
    /// When `target_habitat_id` is set, completion expands that habitat
    /// instead of creating a new one.
    pub fn handle_habitat_placed(
        &mut self,
        tiles: Vec<TilePos>,
        target_habitat_id: Option<EntityId>,
        position: Vec2,
        now: Tick,
        ledger: &mut ResourceLedger,
    ) -> Option<EntityId> {
        match self.handle_item_placed("habitat", position, now, ledger)? {
            PlacedItem::Blueprint(id) => {
                if let Some(blueprint) = self.get_mut(id) {
                    blueprint.habitat_tiles = Some(tiles);
                    blueprint.target_habitat_id = target_habitat_id;
                }
                Some(id)
            }
            PlacedItem::Building(_) => None,
        }
    }

    /// Advance all live blueprints and convert any that completed.
    ///
    /// This is the single authoritative conversion point: completed
    /// blueprints leave the live collection and a building is created at
    /// the same position and size. Habitat payloads are routed through
    /// the habitat manager.
    pub fn update_blueprints(
        &mut self,
        now: Tick,
        habitats: &mut HabitatManager,
    ) -> Vec<ConvertedBuilding> {
        let mut converted = Vec::new();

        for blueprint in &mut self.blueprints {
            let Some(payload) = blueprint.update(now) else {
                continue;
            };
            let definition = self.catalog.get(payload.kind);
            let has_inventory = definition.map(|d| d.has_inventory).unwrap_or(false);

            let mut building = Building::new(
                payload.kind,
                payload.position,
                payload.tile_width,
                payload.tile_height,
                now,
                has_inventory,
            );

            if let Some(tiles) = payload.habitat_tiles {
                let habitat_id = match payload.target_habitat_id {
                    Some(target) if habitats.expand(target, tiles.iter().copied()) => target,
                    _ => habitats.create(tiles),
                };
                building.habitat_id = Some(habitat_id);
            }

            tracing::debug!(
                "blueprint {:?} complete, building {:?} created",
                blueprint.id,
                building.kind
            );
            let building_id = self.buildings.insert(building);
            converted.push(ConvertedBuilding {
                blueprint: blueprint.id,
                building: building_id,
                kind: payload.kind,
            });
        }

        if !converted.is_empty() {
            self.remove_where(|bp| bp.is_complete());
        }
        converted
    }

    /// Cancel and remove a blueprint.
    ///
    /// Delivered resources are not refunded; the caller is responsible
    /// for dropping the blueprint's in-flight delivery jobs.
    pub fn handle_blueprint_canceled(&mut self, id: EntityId) -> bool {
        let Some(&index) = self.by_id.get(&id) else {
            return false;
        };
        self.blueprints[index].cancel();
        self.remove_where(|bp| bp.state() == BlueprintState::Cancelled);
        true
    }

    fn remove_where(&mut self, predicate: impl Fn(&Blueprint) -> bool) {
        self.blueprints.retain(|bp| !predicate(bp));
        self.by_id.clear();
        for (i, blueprint) in self.blueprints.iter().enumerate() {
            self.by_id.insert(blueprint.id, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::resources::ResourceType;

    fn manager() -> BlueprintManager {
        BlueprintManager::new(BuildingCatalog::with_defaults())
    }

    fn rich_ledger() -> ResourceLedger {
        ResourceLedger::with_money(10_000)
    }

    #[test]
    fn test_placement_charges_money() {
        let mut mgr = manager();
        let mut ledger = ResourceLedger::with_money(100);

        // Solar panel costs 50 credits
        let placed = mgr.handle_item_placed("solar panel", Vec2::default(), 0, &mut ledger);
        assert!(matches!(placed, Some(PlacedItem::Blueprint(_))));
        assert_eq!(ledger.money(), 50);

        // Second placement still affordable, third is not
        assert!(mgr
            .handle_item_placed("solar panel", Vec2::default(), 0, &mut ledger)
            .is_some());
        assert!(mgr
            .handle_item_placed("solar panel", Vec2::default(), 0, &mut ledger)
            .is_none());
        // Failed placement leaves the balance untouched
        assert_eq!(ledger.money(), 0);
        assert_eq!(mgr.blueprint_count(), 2);
    }

    #[test]
    fn test_instant_placement_creates_building() {
        let mut mgr = manager();
        let mut ledger = rich_ledger();

        let placed = mgr
            .handle_item_placed("storage depot", Vec2::new(10.0, 10.0), 0, &mut ledger)
            .unwrap();
        let PlacedItem::Building(id) = placed else {
            panic!("depot placement should be instant");
        };
        assert!(mgr.buildings().get(id).unwrap().inventory.is_some());
        assert_eq!(mgr.blueprint_count(), 0);
    }

    #[test]
    fn test_conversion_is_single_authoritative_point() {
        let mut mgr = manager();
        let mut ledger = rich_ledger();
        let mut habitats = HabitatManager::new();

        let placed = mgr
            .handle_item_placed("solar panel", Vec2::new(64.0, 64.0), 0, &mut ledger)
            .unwrap();
        let bp_id = placed.id();

        // Deliver everything; solar panel needs 20 silicon + 5 iron
        {
            let bp = mgr.get_mut(bp_id).unwrap();
            bp.add_resource(ResourceType::Silicon, 20, 10);
            bp.add_resource(ResourceType::Iron, 5, 10);
        }

        // Not complete yet: no conversion
        assert!(mgr.update_blueprints(20, &mut habitats).is_empty());
        assert_eq!(mgr.buildings().len(), 0);

        // After build_effort (80 ticks from tick 10) it converts
        let converted = mgr.update_blueprints(90, &mut habitats);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].kind, BuildingKind::SolarPanel);
        assert!(mgr.get(bp_id).is_none());
        let building = mgr.buildings().get(converted[0].building).unwrap();
        assert!((building.position.x - 64.0).abs() < 0.001);

        // Conversion happens once
        assert!(mgr.update_blueprints(200, &mut habitats).is_empty());
        assert_eq!(mgr.buildings().len(), 1);
    }

    #[test]
    fn test_habitat_completion_creates_habitat() {
        let mut mgr = manager();
        let mut ledger = rich_ledger();
        let mut habitats = HabitatManager::new();

        let tiles = vec![TilePos::new(0, 0), TilePos::new(1, 0)];
        let bp_id = mgr
            .handle_habitat_placed(tiles, None, Vec2::new(16.0, 16.0), 0, &mut ledger)
            .unwrap();
        {
            let bp = mgr.get_mut(bp_id).unwrap();
            bp.add_resource(ResourceType::Steel, 30, 0);
            bp.add_resource(ResourceType::Oxygen, 10, 0);
        }

        let converted = mgr.update_blueprints(200, &mut habitats);
        assert_eq!(converted.len(), 1);
        assert_eq!(habitats.len(), 1);
        let building = mgr.buildings().get(converted[0].building).unwrap();
        let habitat_id = building.habitat_id.unwrap();
        assert_eq!(habitats.get(habitat_id).unwrap().tiles.len(), 2);
    }

    #[test]
    fn test_habitat_completion_expands_target() {
        let mut mgr = manager();
        let mut ledger = rich_ledger();
        let mut habitats = HabitatManager::new();
        let existing = habitats.create([TilePos::new(0, 0)]);

        let bp_id = mgr
            .handle_habitat_placed(
                vec![TilePos::new(1, 0)],
                Some(existing),
                Vec2::new(48.0, 16.0),
                0,
                &mut ledger,
            )
            .unwrap();
        {
            let bp = mgr.get_mut(bp_id).unwrap();
            bp.add_resource(ResourceType::Steel, 30, 0);
            bp.add_resource(ResourceType::Oxygen, 10, 0);
        }

        mgr.update_blueprints(200, &mut habitats);
        assert_eq!(habitats.len(), 1);
        assert_eq!(habitats.get(existing).unwrap().tiles.len(), 2);
    }

    #[test]
    fn test_cancel_removes_blueprint() {
        let mut mgr = manager();
        let mut ledger = rich_ledger();
        let bp_id = mgr
            .handle_item_placed("solar panel", Vec2::default(), 0, &mut ledger)
            .unwrap()
            .id();

        assert!(mgr.handle_blueprint_canceled(bp_id));
        assert!(mgr.get(bp_id).is_none());
        assert_eq!(mgr.blueprint_count(), 0);
        // Cancelling twice is a no-op
        assert!(!mgr.handle_blueprint_canceled(bp_id));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_generic() {
        let mut mgr = manager();
        let mut ledger = rich_ledger();
        let placed = mgr
            .handle_item_placed("space elevator", Vec2::default(), 0, &mut ledger)
            .unwrap();
        let bp = mgr.get(placed.id()).unwrap();
        assert_eq!(bp.kind, BuildingKind::Generic);
        assert_eq!((bp.tile_width, bp.tile_height), (1, 1));
    }
}
