//! Optimus - general-purpose worker robot with a FIFO task queue
//!
//! The job manager drives Optimus units through two-phase delivery
//! commands: move to a resource node, pick up, move to a blueprint,
//! deliver. Units the blueprint does not accept are dropped back onto
//! the ground as a resource node at the robot's tile.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::colony::manager::BlueprintManager;
use crate::colony::node::NodeRegistry;
use crate::colony::resources::ResourceType;
use crate::core::config::config;
use crate::core::types::{EntityId, Tick, Vec2};

use super::{has_reached, step_toward, RobotState};

/// A single command in an Optimus task queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RobotTask {
    MoveTo(Vec2),
    PickupNode {
        node: EntityId,
        resource: ResourceType,
        amount: u32,
    },
    DeliverToBlueprint {
        blueprint: EntityId,
    },
    Work {
        ticks: Tick,
    },
}

/// Outcome of one Optimus update, reported to the orchestrator
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    PickedUp {
        robot: EntityId,
        node: EntityId,
        resource: ResourceType,
        amount: u32,
    },
    Delivered {
        robot: EntityId,
        blueprint: EntityId,
        resource: ResourceType,
        accepted: u32,
        leftover: u32,
    },
}

/// General-purpose worker robot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Optimus {
    pub id: EntityId,
    pub position: Vec2,
    pub home: Vec2,
    pub speed: f32,
    pub health: f32,
    pub alive: bool,
    state: RobotState,
    target: Option<Vec2>,
    tasks: VecDeque<RobotTask>,
    pub carrying: Option<(ResourceType, u32)>,
    current_job: Option<EntityId>,
    work_until: Option<Tick>,
}

impl Optimus {
    pub fn new(home: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            position: home,
            home,
            speed: config().robot_speed,
            health: 100.0,
            alive: true,
            state: RobotState::Idle,
            target: None,
            tasks: VecDeque::new(),
            carrying: None,
            current_job: None,
            work_until: None,
        }
    }

    pub fn state(&self) -> RobotState {
        self.state
    }

    pub fn current_job(&self) -> Option<EntityId> {
        self.current_job
    }

    /// The availability contract the job manager relies on: idle, no
    /// queued tasks, no in-flight job. Guarantees one job at a time.
    pub fn is_available(&self) -> bool {
        self.alive
            && self.state == RobotState::Idle
            && self.tasks.is_empty()
            && self.current_job.is_none()
    }

    pub fn enqueue(&mut self, task: RobotTask) {
        self.tasks.push_back(task);
    }

    /// Issue the two-phase pickup/deliver command sequence for a job
    pub fn assign_delivery(
        &mut self,
        job: EntityId,
        node: EntityId,
        node_position: Vec2,
        blueprint: EntityId,
        blueprint_position: Vec2,
        resource: ResourceType,
        amount: u32,
    ) {
        self.current_job = Some(job);
        self.tasks.push_back(RobotTask::MoveTo(node_position));
        // Harvesting takes time at the node before the load is picked up
        self.tasks.push_back(RobotTask::Work {
            ticks: config().work_duration,
        });
        self.tasks.push_back(RobotTask::PickupNode {
            node,
            resource,
            amount,
        });
        self.tasks.push_back(RobotTask::MoveTo(blueprint_position));
        self.tasks.push_back(RobotTask::DeliverToBlueprint { blueprint });
    }

    /// Drop the current job and any queued delivery tasks.
    ///
    /// Carried units are not destroyed: they are deposited as a resource
    /// node at the robot's tile so a later job can recover them.
    pub fn cancel_job(&mut self, nodes: &mut NodeRegistry) {
        self.tasks.clear();
        self.current_job = None;
        self.work_until = None;
        self.target = None;
        if let Some((resource, amount)) = self.carrying.take() {
            if amount > 0 {
                nodes.deposit(self.position, resource, amount);
            }
        }
        if self.state != RobotState::Idle {
            self.state = RobotState::Idle;
        }
    }

    /// Advance the state machine one tick
    pub fn update(
        &mut self,
        now: Tick,
        nodes: &mut NodeRegistry,
        blueprints: &mut BlueprintManager,
    ) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::new();
        if !self.alive {
            return outcomes;
        }
        let threshold = config().reach_threshold;

        match self.state {
            RobotState::Idle => {
                if let Some(task) = self.tasks.pop_front() {
                    self.start_task(task, now, nodes, blueprints, &mut outcomes);
                } else if !has_reached(self.position, self.home, threshold) {
                    self.state = RobotState::Returning;
                }
            }
            RobotState::Moving => {
                let target = self.target.unwrap_or(self.home);
                self.position = step_toward(self.position, target, self.speed);
                if has_reached(self.position, target, threshold) {
                    self.target = None;
                    self.state = RobotState::Idle;
                }
            }
            RobotState::Working => {
                if self.work_until.map(|t| now >= t).unwrap_or(true) {
                    self.work_until = None;
                    self.state = RobotState::Idle;
                }
            }
            RobotState::Returning => {
                self.position = step_toward(self.position, self.home, self.speed);
                if has_reached(self.position, self.home, threshold) {
                    self.state = RobotState::Idle;
                }
            }
        }
        outcomes
    }

    fn start_task(
        &mut self,
        task: RobotTask,
        now: Tick,
        nodes: &mut NodeRegistry,
        blueprints: &mut BlueprintManager,
        outcomes: &mut Vec<DeliveryOutcome>,
    ) {
        match task {
            RobotTask::MoveTo(target) => {
                self.target = Some(target);
                self.state = RobotState::Moving;
            }
            RobotTask::Work { ticks } => {
                self.work_until = Some(now + ticks);
                self.state = RobotState::Working;
            }
            RobotTask::PickupNode {
                node,
                resource,
                amount,
            } => {
                // Node may have been depleted or merged away since the job
                // was issued; a missed pickup just delivers nothing.
                if let Some(found) = nodes.get_mut(node) {
                    if found.resource_type == resource {
                        let picked = found.harvest(amount);
                        if picked > 0 {
                            let total = match self.carrying {
                                Some((carried, existing)) if carried == resource => {
                                    existing + picked
                                }
                                _ => picked,
                            };
                            self.carrying = Some((resource, total));
                            outcomes.push(DeliveryOutcome::PickedUp {
                                robot: self.id,
                                node,
                                resource,
                                amount: picked,
                            });
                        }
                    }
                }
            }
            RobotTask::DeliverToBlueprint { blueprint } => {
                if let Some((resource, amount)) = self.carrying.take() {
                    let accepted = blueprints
                        .get_mut(blueprint)
                        .map(|bp| bp.add_resource(resource, amount, now))
                        .unwrap_or(0);
                    let leftover = amount - accepted;
                    if leftover > 0 {
                        nodes.deposit(self.position, resource, leftover);
                    }
                    outcomes.push(DeliveryOutcome::Delivered {
                        robot: self.id,
                        blueprint,
                        resource,
                        accepted,
                        leftover,
                    });
                }
                self.current_job = None;
            }
        }
    }
}
