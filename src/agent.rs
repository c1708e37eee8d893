use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventWriter,
    query::Without,
    system::{Commands, Query, Res, ResMut},
};
use bevy_math::Vec3;
use bevy_reflect::{FromReflect, Reflect};
use bevy_time::Time;
use bevy_transform::prelude::Transform;
use bevy_utils::tracing::{debug, info, warn};

use crate::{follower::Step, NavSurface, PathFollower};

#[derive(Debug, Reflect, FromReflect, Component, Clone, Copy)]
pub struct PathfindingAgent {
    pub speed: f32,
}

impl Default for PathfindingAgent {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl PathfindingAgent {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// Walk from the current translation to this point, replacing any path in progress.
#[derive(Debug, Reflect, FromReflect, Component, Clone, Copy)]
pub struct SetDestination(pub Vec3);

#[derive(Debug, Component, Reflect, FromReflect)]
pub struct NoPath;

#[derive(Debug, Component, Reflect, FromReflect)]
pub struct FollowingPaused;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalReached {
    pub entity: Entity,
}

pub(crate) fn initialize_surface(surface: Option<ResMut<NavSurface>>) {
    let mut surface = match surface {
        Some(surface) => surface,
        None => {
            warn!("No NavSurface resource, skipping nav graph initialization");
            return;
        }
    };
    if let Err(err) = surface.initialize() {
        warn!("Failed to initialize nav graph: {}", err);
    }
}

pub(crate) fn compute_requested_paths(
    mut requests_query: Query<(
        Entity,
        &Transform,
        &SetDestination,
        &PathfindingAgent,
        Option<&mut PathFollower>,
    )>,
    surface: Option<ResMut<NavSurface>>,
    mut commands: Commands,
) {
    if requests_query.is_empty() {
        return;
    }
    let mut surface = match surface {
        Some(surface) => surface,
        None => {
            warn!("No NavSurface resource, destination requests are waiting");
            return;
        }
    };

    for (entity, transform, destination, agent, follower) in requests_query.iter_mut() {
        let mut entity_commands = commands.entity(entity);
        entity_commands.remove::<SetDestination>();

        let path = match surface.request_path(transform.translation, destination.0) {
            Ok(path) => path,
            Err(err) => {
                info!("No path found: {}", err);
                entity_commands.insert(NoPath);
                continue;
            }
        };
        info!("Found path: {:?}", path.points());

        let assigned = match follower {
            Some(mut follower) => {
                follower.set_speed(agent.speed);
                follower.assign(path)
            }
            None => {
                let mut follower = PathFollower::new(agent.speed);
                let assigned = follower.assign(path);
                entity_commands.insert(follower);
                assigned
            }
        };
        match assigned {
            Ok(()) => {
                entity_commands.remove::<NoPath>();
            }
            Err(err) => {
                info!("Path rejected: {}", err);
                entity_commands.insert(NoPath);
            }
        }
    }
}

pub(crate) fn move_followers(
    mut followers_query: Query<(Entity, &mut Transform, &mut PathFollower), Without<FollowingPaused>>,
    time: Res<Time>,
    mut goal_reached: EventWriter<GoalReached>,
) {
    let delta = time.delta_seconds();
    for (entity, mut transform, mut follower) in followers_query.iter_mut() {
        if !follower.is_following() {
            continue;
        }

        match follower.tick(delta) {
            Some(Step::Moved(position)) => transform.translation = position,
            Some(Step::ReachedGoal(position)) => {
                transform.translation = position;
                debug!("{:?} reached its goal", entity);
                goal_reached.send(GoalReached { entity });
            }
            None => {}
        }
    }
}
