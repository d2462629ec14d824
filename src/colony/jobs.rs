//! Job manager - matches unmet blueprint requirements to nodes and robots
//!
//! Matching is deliberately simple: first node holding the resource,
//! first available robot, no distance weighting or priorities. The pass
//! runs every tick, so demand that cannot be satisfied now is retried
//! naturally once a node appears or a robot frees up.

use crate::core::types::EntityId;
use crate::robots::Optimus;

use super::blueprint::BlueprintState;
use super::manager::BlueprintManager;
use super::node::NodeRegistry;
use super::resources::ResourceType;

/// A two-phase pickup/deliver assignment issued to one robot
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub id: EntityId,
    pub robot: EntityId,
    pub node: EntityId,
    pub blueprint: EntityId,
    pub resource: ResourceType,
    pub amount: u32,
}

/// Tracks in-flight delivery jobs and creates new ones
#[derive(Debug, Clone, Default)]
pub struct JobManager {
    jobs: Vec<DeliveryJob>,
}

impl JobManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[DeliveryJob] {
        &self.jobs
    }

    /// Whether a blueprint's requirement is already covered in flight
    pub fn has_job_for(&self, blueprint: EntityId, resource: ResourceType) -> bool {
        self.jobs
            .iter()
            .any(|j| j.blueprint == blueprint && j.resource == resource)
    }

    /// Match every uncovered unmet requirement to a node and a robot.
    ///
    /// One robot takes one job at a time; a blueprint with several unmet
    /// resource types can receive one robot per type when enough robots
    /// are idle. Returns the jobs assigned this pass.
    pub fn create_delivery_jobs(
        &mut self,
        blueprints: &BlueprintManager,
        nodes: &NodeRegistry,
        robots: &mut [Optimus],
    ) -> Vec<DeliveryJob> {
        let mut assigned = Vec::new();

        for blueprint in blueprints.iter() {
            if blueprint.state() != BlueprintState::Collecting {
                continue;
            }
            for requirement in blueprint.unmet_requirements() {
                if self.has_job_for(blueprint.id, requirement.resource) {
                    continue;
                }
                // First matching node; none available means the
                // requirement stays unmet until a node appears
                let Some(node) = nodes.find_with_resource(requirement.resource) else {
                    continue;
                };
                // First available robot; none means retry next pass
                let Some(robot) = robots.iter_mut().find(|r| r.is_available()) else {
                    continue;
                };

                let job = DeliveryJob {
                    id: EntityId::new(),
                    robot: robot.id,
                    node: node.id,
                    blueprint: blueprint.id,
                    resource: requirement.resource,
                    amount: requirement.outstanding(),
                };
                robot.assign_delivery(
                    job.id,
                    node.id,
                    node.position,
                    blueprint.id,
                    blueprint.position,
                    job.resource,
                    job.amount,
                );
                tracing::debug!(
                    "job {:?}: robot {:?} hauls {}x{:?} to blueprint {:?}",
                    job.id,
                    job.robot,
                    job.amount,
                    job.resource,
                    job.blueprint
                );
                self.jobs.push(job.clone());
                assigned.push(job);
            }
        }
        assigned
    }

    /// Drop all jobs for a cancelled or converted blueprint, clearing the
    /// affected robots' delivery tasks (carried units are recovered as
    /// ground nodes by the robots themselves).
    pub fn cancel_jobs_for_blueprint(
        &mut self,
        blueprint: EntityId,
        robots: &mut [Optimus],
        nodes: &mut NodeRegistry,
    ) {
        for job in self.jobs.iter().filter(|j| j.blueprint == blueprint) {
            if let Some(robot) = robots.iter_mut().find(|r| r.id == job.robot) {
                robot.cancel_job(nodes);
            }
        }
        self.jobs.retain(|j| j.blueprint != blueprint);
    }

    /// Forget jobs whose robot has finished (or died and lost) them
    pub fn sweep_finished(&mut self, robots: &[Optimus]) {
        self.jobs.retain(|job| {
            robots
                .iter()
                .find(|r| r.id == job.robot)
                .map(|r| r.alive && r.current_job() == Some(job.id))
                .unwrap_or(false)
        });
    }
}
