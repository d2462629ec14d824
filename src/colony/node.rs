//! Resource nodes - depletable world-positioned stacks of one resource type

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{EntityId, TilePos, Vec2};

use super::resources::ResourceType;

/// A depletable stack of one resource type at a world position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: EntityId,
    pub position: Vec2,
    pub resource_type: ResourceType,
    pub amount: u32,
}

impl ResourceNode {
    pub fn new(position: Vec2, resource_type: ResourceType, amount: u32) -> Self {
        Self {
            id: EntityId::new(),
            position,
            resource_type,
            amount,
        }
    }

    /// Harvest up to `requested` units, returns the amount actually taken.
    ///
    /// A zero request is a no-op. A node at zero is depleted and removed
    /// by the registry sweep.
    pub fn harvest(&mut self, requested: u32) -> u32 {
        let harvested = requested.min(self.amount);
        self.amount -= harvested;
        harvested
    }

    /// Merge additional units into this stack
    pub fn add_amount(&mut self, delta: u32) {
        self.amount += delta;
    }

    pub fn is_depleted(&self) -> bool {
        self.amount == 0
    }

    pub fn tile(&self) -> TilePos {
        TilePos::from_world(self.position, config().tile_size)
    }
}

/// Registry of all live resource nodes
///
/// Depleted nodes are swept out so no consumer ever observes a dead node.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<ResourceNode>,
    by_id: AHashMap<EntityId, usize>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, node: ResourceNode) -> EntityId {
        let id = node.id;
        self.by_id.insert(id, self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&ResourceNode> {
        self.by_id.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut ResourceNode> {
        self.by_id.get(&id).map(|&i| &mut self.nodes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    /// First node holding the given resource type with a positive amount
    /// (linear scan, first-match)
    pub fn find_with_resource(&self, resource: ResourceType) -> Option<&ResourceNode> {
        self.nodes
            .iter()
            .find(|n| n.resource_type == resource && n.amount > 0)
    }

    /// Deposit units at a world position, merging into an existing node of
    /// the same type on the same tile, else creating a new node.
    pub fn deposit(&mut self, position: Vec2, resource: ResourceType, amount: u32) -> EntityId {
        let tile = TilePos::from_world(position, config().tile_size);
        let existing = self
            .nodes
            .iter_mut()
            .find(|n| n.resource_type == resource && n.tile() == tile);
        if let Some(node) = existing {
            node.add_amount(amount);
            node.id
        } else {
            self.insert(ResourceNode::new(position, resource, amount))
        }
    }

    /// Remove depleted nodes, returns the ids removed
    pub fn sweep_depleted(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self
            .nodes
            .iter()
            .filter(|n| n.is_depleted())
            .map(|n| n.id)
            .collect();
        if !removed.is_empty() {
            self.nodes.retain(|n| !n.is_depleted());
            self.by_id.clear();
            for (i, node) in self.nodes.iter().enumerate() {
                self.by_id.insert(node.id, i);
            }
        }
        removed
    }
}
