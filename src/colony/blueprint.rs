//! Blueprint - resource accumulation and construction state machine
//!
//! A blueprint is a pending building placeholder. It collects resources
//! tile-by-tile until every requirement is met, then construction runs on
//! a tick deadline, and completion yields a one-shot payload that the
//! blueprint manager converts into a real building.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Tick, TilePos, Vec2};

use super::catalog::{BuildingDefinition, BuildingKind};
use super::resources::ResourceType;

/// Lifecycle state of a blueprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlueprintState {
    /// Accumulating required resources
    Collecting,
    /// All requirements met, construction in progress
    Building,
    /// Construction finished; awaiting conversion to a building
    Complete,
    /// Cancelled before completion (exit state)
    Cancelled,
}

/// One resource requirement and how much of it has been delivered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub resource: ResourceType,
    pub required: u32,
    pub delivered: u32,
}

impl Requirement {
    pub fn outstanding(&self) -> u32 {
        self.required - self.delivered
    }

    pub fn is_met(&self) -> bool {
        self.delivered >= self.required
    }
}

/// Completion notification handed to the blueprint manager
#[derive(Debug, Clone)]
pub struct CompletionPayload {
    pub kind: BuildingKind,
    pub position: Vec2,
    pub tile_width: u32,
    pub tile_height: u32,
    pub habitat_tiles: Option<Vec<TilePos>>,
    pub target_habitat_id: Option<EntityId>,
}

/// A pending building accumulating resources before construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: EntityId,
    pub kind: BuildingKind,
    pub position: Vec2,
    pub tile_width: u32,
    pub tile_height: u32,
    requirements: Vec<Requirement>,
    build_effort: Tick,
    build_started_tick: Option<Tick>,
    progress: f32,
    state: BlueprintState,
    /// Habitat blueprints cover an arbitrary tile set instead of a rectangle
    pub habitat_tiles: Option<Vec<TilePos>>,
    /// When set, completion expands this habitat instead of creating one
    pub target_habitat_id: Option<EntityId>,
}

impl Blueprint {
    /// Create a blueprint from a catalog definition
    ///
    /// A definition with no resource cost starts building immediately.
    pub fn from_definition(definition: &BuildingDefinition, position: Vec2, now: Tick) -> Self {
        let requirements: Vec<Requirement> = definition
            .cost
            .iter()
            .map(|&(resource, required)| Requirement {
                resource,
                required,
                delivered: 0,
            })
            .collect();

        let mut blueprint = Self {
            id: EntityId::new(),
            kind: definition.kind,
            position,
            tile_width: definition.tile_width,
            tile_height: definition.tile_height,
            requirements,
            build_effort: definition.build_effort,
            build_started_tick: None,
            progress: 0.0,
            state: BlueprintState::Collecting,
            habitat_tiles: None,
            target_habitat_id: None,
        };
        if blueprint.all_requirements_met() {
            blueprint.start_building(now);
        }
        blueprint
    }

    pub fn state(&self) -> BlueprintState {
        self.state
    }

    /// Construction progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Requirements still short of their target
    pub fn unmet_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|r| !r.is_met())
    }

    fn all_requirements_met(&self) -> bool {
        self.requirements.iter().all(Requirement::is_met)
    }

    /// Deliver resources toward a requirement, returns the amount accepted.
    ///
    /// Acceptance is capped at the requirement's outstanding amount; a
    /// resource this blueprint does not need is accepted as 0 (a defined
    /// outcome, not an error) so the caller can recover the unused units.
    /// The delivery that satisfies the final requirement starts the build.
    pub fn add_resource(&mut self, resource: ResourceType, amount: u32, now: Tick) -> u32 {
        if self.state != BlueprintState::Collecting {
            return 0;
        }
        let Some(requirement) = self
            .requirements
            .iter_mut()
            .find(|r| r.resource == resource)
        else {
            return 0;
        };

        let accepted = amount.min(requirement.outstanding());
        requirement.delivered += accepted;

        if accepted > 0 && self.all_requirements_met() {
            self.start_building(now);
        }
        accepted
    }

    fn start_building(&mut self, now: Tick) {
        self.state = BlueprintState::Building;
        self.build_started_tick = Some(now);
        if self.build_effort == 0 {
            self.progress = 1.0;
        }
    }

    /// Advance construction; returns the completion payload exactly once,
    /// on the update that reaches full progress.
    pub fn update(&mut self, now: Tick) -> Option<CompletionPayload> {
        if self.state != BlueprintState::Building {
            return None;
        }
        let started = self
            .build_started_tick
            .unwrap_or(now);
        let elapsed = now.saturating_sub(started);
        let raw = if self.build_effort == 0 {
            1.0
        } else {
            elapsed as f32 / self.build_effort as f32
        };
        // Progress only moves forward, clamped at 1.0
        self.progress = self.progress.max(raw.min(1.0));

        if self.progress >= 1.0 {
            self.state = BlueprintState::Complete;
            return Some(CompletionPayload {
                kind: self.kind,
                position: self.position,
                tile_width: self.tile_width,
                tile_height: self.tile_height,
                habitat_tiles: self.habitat_tiles.clone(),
                target_habitat_id: self.target_habitat_id,
            });
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.state == BlueprintState::Complete
    }

    /// Mark cancelled. Delivered resources are not refunded; the job
    /// manager is responsible for dropping any in-flight delivery job.
    pub fn cancel(&mut self) {
        if self.state != BlueprintState::Complete {
            self.state = BlueprintState::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::catalog::Placement;
    use proptest::prelude::*;

    fn test_definition(cost: Vec<(ResourceType, u32)>, effort: Tick) -> BuildingDefinition {
        BuildingDefinition {
            kind: BuildingKind::SolarPanel,
            display_name: "Solar Panel".into(),
            cost,
            tile_width: 1,
            tile_height: 1,
            build_effort: effort,
            money_cost: 0,
            placement: Placement::Blueprint,
            has_inventory: false,
        }
    }

    #[test]
    fn test_accumulation_capped_and_gate() {
        // Requires {iron: 20, water: 5}
        let def = test_definition(
            vec![(ResourceType::Iron, 20), (ResourceType::Water, 5)],
            100,
        );
        let mut bp = Blueprint::from_definition(&def, Vec2::new(0.0, 0.0), 0);
        assert_eq!(bp.state(), BlueprintState::Collecting);

        // Offering 25 iron accepts exactly 20
        assert_eq!(bp.add_resource(ResourceType::Iron, 25, 10), 20);
        assert_eq!(bp.requirements()[0].delivered, 20);
        // One requirement met out of two: must not start building
        assert_eq!(bp.state(), BlueprintState::Collecting);

        // Final delivery triggers the transition and records the start tick
        assert_eq!(bp.add_resource(ResourceType::Water, 5, 42), 5);
        assert_eq!(bp.state(), BlueprintState::Building);
        assert_eq!(bp.build_started_tick, Some(42));

        // After build_effort ticks elapse the blueprint completes
        assert!(bp.update(100).is_none());
        let payload = bp.update(142).expect("completion payload");
        assert_eq!(payload.kind, BuildingKind::SolarPanel);
        assert!(bp.is_complete());
    }

    #[test]
    fn test_unrequired_resource_accepted_as_zero() {
        let def = test_definition(vec![(ResourceType::Iron, 20)], 100);
        let mut bp = Blueprint::from_definition(&def, Vec2::default(), 0);
        assert_eq!(bp.add_resource(ResourceType::Silicon, 10, 0), 0);
        assert_eq!(bp.state(), BlueprintState::Collecting);
    }

    #[test]
    fn test_progress_monotonic_and_clamped() {
        let def = test_definition(vec![], 100);
        // Empty cost: starts building immediately
        let mut bp = Blueprint::from_definition(&def, Vec2::default(), 0);
        assert_eq!(bp.state(), BlueprintState::Building);

        let mut last = 0.0f32;
        for now in [10u64, 25, 50, 75, 99] {
            bp.update(now);
            assert!(bp.progress() >= last);
            assert!(bp.progress() < 1.0);
            last = bp.progress();
        }
        assert!(bp.update(100).is_some());
        assert!((bp.progress() - 1.0).abs() < f32::EPSILON);

        // Once at 1.0, further time never exceeds 1.0 and never re-emits
        assert!(bp.update(10_000).is_none());
        assert!((bp.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_completion_emitted_exactly_once() {
        let def = test_definition(vec![], 10);
        let mut bp = Blueprint::from_definition(&def, Vec2::default(), 0);
        let mut payloads = 0;
        for now in 0..50u64 {
            if bp.update(now).is_some() {
                payloads += 1;
            }
        }
        assert_eq!(payloads, 1);
    }

    #[test]
    fn test_zero_effort_completes_on_first_update() {
        let def = test_definition(vec![(ResourceType::Iron, 1)], 0);
        let mut bp = Blueprint::from_definition(&def, Vec2::default(), 0);
        assert_eq!(bp.add_resource(ResourceType::Iron, 1, 5), 1);
        assert!(bp.update(5).is_some());
    }

    #[test]
    fn test_cancel_stops_accumulation() {
        let def = test_definition(vec![(ResourceType::Iron, 20)], 100);
        let mut bp = Blueprint::from_definition(&def, Vec2::default(), 0);
        bp.add_resource(ResourceType::Iron, 5, 0);
        bp.cancel();
        assert_eq!(bp.state(), BlueprintState::Cancelled);
        // No further deliveries accepted, no progress
        assert_eq!(bp.add_resource(ResourceType::Iron, 15, 1), 0);
        assert!(bp.update(1_000).is_none());
    }

    proptest! {
        /// For any sequence of deliveries, delivered never exceeds required
        /// and the sum of accepted amounts is min(total offered, required).
        #[test]
        fn prop_accumulation_bound(
            required in 1u32..500,
            offers in proptest::collection::vec(0u32..200, 1..20),
        ) {
            let def = test_definition(vec![(ResourceType::Iron, required)], 1_000);
            let mut bp = Blueprint::from_definition(&def, Vec2::default(), 0);

            let mut total_offered: u64 = 0;
            let mut total_accepted: u64 = 0;
            for (i, offer) in offers.iter().enumerate() {
                total_offered += u64::from(*offer);
                total_accepted += u64::from(bp.add_resource(ResourceType::Iron, *offer, i as Tick));
                prop_assert!(bp.requirements()[0].delivered <= required);
            }
            prop_assert_eq!(total_accepted, total_offered.min(u64::from(required)));
        }
    }
}
