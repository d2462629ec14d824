//! Habitat manager - merge/expand bookkeeping for multi-tile habitats
//!
//! A habitat is an arbitrary set of tiles. Completed habitat blueprints
//! either create a new habitat or expand an existing one, and habitats
//! that come to share an edge are merged into a single habitat.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, TilePos};

/// One side of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

const SIDES: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

/// A multi-tile habitat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habitat {
    pub id: EntityId,
    pub tiles: AHashSet<TilePos>,
}

impl Habitat {
    /// Sides of `tile` that need a wall: each side lacking a neighboring
    /// tile of the same habitat.
    pub fn walls(&self, tile: TilePos) -> Vec<Side> {
        if !self.tiles.contains(&tile) {
            return Vec::new();
        }
        tile.neighbors()
            .iter()
            .zip(SIDES)
            .filter(|(neighbor, _)| !self.tiles.contains(neighbor))
            .map(|(_, side)| side)
            .collect()
    }

    fn is_adjacent_to(&self, other: &Habitat) -> bool {
        self.tiles
            .iter()
            .flat_map(|t| t.neighbors())
            .any(|n| other.tiles.contains(&n))
    }
}

/// Registry and merge/expand logic for all habitats
#[derive(Debug, Clone, Default)]
pub struct HabitatManager {
    habitats: AHashMap<EntityId, Habitat>,
}

impl HabitatManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.habitats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habitats.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Habitat> {
        self.habitats.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habitat> {
        self.habitats.values()
    }

    /// Create a new habitat from a tile set
    pub fn create(&mut self, tiles: impl IntoIterator<Item = TilePos>) -> EntityId {
        let id = EntityId::new();
        self.habitats.insert(
            id,
            Habitat {
                id,
                tiles: tiles.into_iter().collect(),
            },
        );
        self.merge_adjacent();
        id
    }

    /// Expand an existing habitat with additional tiles.
    ///
    /// Returns false when the habitat does not exist (the caller falls
    /// back to creating a fresh habitat).
    pub fn expand(&mut self, id: EntityId, tiles: impl IntoIterator<Item = TilePos>) -> bool {
        let Some(habitat) = self.habitats.get_mut(&id) else {
            return false;
        };
        habitat.tiles.extend(tiles);
        self.merge_adjacent();
        true
    }

    /// Habitat containing the given tile, if any
    pub fn habitat_at(&self, tile: TilePos) -> Option<EntityId> {
        self.habitats
            .values()
            .find(|h| h.tiles.contains(&tile))
            .map(|h| h.id)
    }

    /// Merge habitats that share an edge until none are adjacent.
    ///
    /// The surviving habitat keeps the id of the absorbing side, so ids
    /// held by callers may become stale; `habitat_at` is the durable lookup.
    pub fn merge_adjacent(&mut self) {
        loop {
            let ids: Vec<EntityId> = self.habitats.keys().copied().collect();
            let mut merged_pair = None;
            'outer: for (i, &a) in ids.iter().enumerate() {
                for &b in &ids[i + 1..] {
                    let adjacent = {
                        let ha = &self.habitats[&a];
                        let hb = &self.habitats[&b];
                        ha.is_adjacent_to(hb)
                    };
                    if adjacent {
                        merged_pair = Some((a, b));
                        break 'outer;
                    }
                }
            }
            match merged_pair {
                Some((keep, absorb)) => {
                    if let Some(absorbed) = self.habitats.remove(&absorb) {
                        if let Some(keeper) = self.habitats.get_mut(&keep) {
                            keeper.tiles.extend(absorbed.tiles);
                        }
                    }
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_on_edge_tiles() {
        let mut manager = HabitatManager::new();
        // Two tiles side by side: (0,0) and (1,0)
        let id = manager.create([TilePos::new(0, 0), TilePos::new(1, 0)]);
        let habitat = manager.get(id).unwrap();

        let left_walls = habitat.walls(TilePos::new(0, 0));
        // Left tile has a neighbor to the east only
        assert!(left_walls.contains(&Side::North));
        assert!(left_walls.contains(&Side::South));
        assert!(left_walls.contains(&Side::West));
        assert!(!left_walls.contains(&Side::East));

        // A tile outside the habitat has no wall computation
        assert!(habitat.walls(TilePos::new(5, 5)).is_empty());
    }

    #[test]
    fn test_interior_tile_has_no_walls() {
        let mut manager = HabitatManager::new();
        // Plus-shape around (1,1)
        let id = manager.create([
            TilePos::new(1, 1),
            TilePos::new(1, 0),
            TilePos::new(2, 1),
            TilePos::new(1, 2),
            TilePos::new(0, 1),
        ]);
        let habitat = manager.get(id).unwrap();
        assert!(habitat.walls(TilePos::new(1, 1)).is_empty());
    }

    #[test]
    fn test_expand_existing() {
        let mut manager = HabitatManager::new();
        let id = manager.create([TilePos::new(0, 0)]);
        assert!(manager.expand(id, [TilePos::new(1, 0)]));
        assert_eq!(manager.get(id).unwrap().tiles.len(), 2);

        // Expanding a missing habitat reports failure
        assert!(!manager.expand(EntityId::new(), [TilePos::new(9, 9)]));
    }

    #[test]
    fn test_adjacent_habitats_merge() {
        let mut manager = HabitatManager::new();
        manager.create([TilePos::new(0, 0)]);
        assert_eq!(manager.len(), 1);

        // New habitat sharing an edge collapses into one combined tile set
        manager.create([TilePos::new(1, 0), TilePos::new(2, 0)]);
        assert_eq!(manager.len(), 1);
        let id = manager.habitat_at(TilePos::new(0, 0)).unwrap();
        assert_eq!(manager.get(id).unwrap().tiles.len(), 3);
    }

    #[test]
    fn test_diagonal_habitats_stay_separate() {
        let mut manager = HabitatManager::new();
        manager.create([TilePos::new(0, 0)]);
        // Diagonal contact is not an edge
        manager.create([TilePos::new(1, 1)]);
        assert_eq!(manager.len(), 2);
    }
}
