//! Tile occupancy - exclusive per-tile claims for ground movers
//!
//! Enemies step tile-to-tile and a tile can hold at most one occupant.
//! A failed claim means the mover halts in place and retries later; the
//! map itself never evicts anyone.

use ahash::AHashMap;

use crate::core::types::{EntityId, TilePos};

/// Sparse map of claimed tiles
#[derive(Debug, Clone, Default)]
pub struct TileOccupancy {
    claims: AHashMap<TilePos, EntityId>,
}

impl TileOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a tile. Fails if another entity holds it; re-claiming a tile
    /// you already hold succeeds.
    pub fn try_claim(&mut self, tile: TilePos, occupant: EntityId) -> bool {
        match self.claims.get(&tile) {
            Some(&holder) => holder == occupant,
            None => {
                self.claims.insert(tile, occupant);
                true
            }
        }
    }

    pub fn occupant(&self, tile: TilePos) -> Option<EntityId> {
        self.claims.get(&tile).copied()
    }

    pub fn is_free(&self, tile: TilePos) -> bool {
        !self.claims.contains_key(&tile)
    }

    /// Release a tile only if the given entity holds it
    pub fn release(&mut self, tile: TilePos, occupant: EntityId) {
        if self.claims.get(&tile) == Some(&occupant) {
            self.claims.remove(&tile);
        }
    }

    /// Atomically move an occupant's claim between tiles. The old claim is
    /// kept when the destination is taken.
    pub fn move_occupant(&mut self, from: TilePos, to: TilePos, occupant: EntityId) -> bool {
        if from == to {
            return self.try_claim(to, occupant);
        }
        if !self.try_claim(to, occupant) {
            return false;
        }
        self.release(from, occupant);
        true
    }

    /// Drop every claim held by an entity (despawn cleanup)
    pub fn release_all_of(&mut self, occupant: EntityId) {
        self.claims.retain(|_, holder| *holder != occupant);
    }

    pub fn claimed_count(&self) -> usize {
        self.claims.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_exclusive() {
        let mut occ = TileOccupancy::new();
        let a = EntityId::new();
        let b = EntityId::new();
        let tile = TilePos::new(3, 4);

        assert!(occ.try_claim(tile, a));
        assert!(!occ.try_claim(tile, b));
        assert_eq!(occ.occupant(tile), Some(a));
        // Idempotent for the holder
        assert!(occ.try_claim(tile, a));
    }

    #[test]
    fn test_release_requires_holder() {
        let mut occ = TileOccupancy::new();
        let a = EntityId::new();
        let b = EntityId::new();
        let tile = TilePos::new(0, 0);

        occ.try_claim(tile, a);
        occ.release(tile, b);
        assert_eq!(occ.occupant(tile), Some(a));
        occ.release(tile, a);
        assert!(occ.is_free(tile));
    }

    #[test]
    fn test_move_keeps_old_claim_on_conflict() {
        let mut occ = TileOccupancy::new();
        let a = EntityId::new();
        let b = EntityId::new();
        let from = TilePos::new(0, 0);
        let to = TilePos::new(1, 0);

        occ.try_claim(from, a);
        occ.try_claim(to, b);
        assert!(!occ.move_occupant(from, to, a));
        assert_eq!(occ.occupant(from), Some(a));
        assert_eq!(occ.occupant(to), Some(b));

        occ.release(to, b);
        assert!(occ.move_occupant(from, to, a));
        assert!(occ.is_free(from));
        assert_eq!(occ.occupant(to), Some(a));
    }

    #[test]
    fn test_release_all_of() {
        let mut occ = TileOccupancy::new();
        let a = EntityId::new();
        occ.try_claim(TilePos::new(0, 0), a);
        occ.try_claim(TilePos::new(1, 0), a);
        occ.release_all_of(a);
        assert_eq!(occ.claimed_count(), 0);
    }
}
