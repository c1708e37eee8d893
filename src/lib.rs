mod agent;
mod error;
mod follower;
pub mod mesh;
mod navigation;
mod path;
mod pathfinding;
mod surface;

use bevy_app::{App, Plugin};
use bevy_ecs::schedule::{IntoSystemDescriptor, SystemLabel};

use agent::{compute_requested_paths, initialize_surface, move_followers};
pub use agent::{FollowingPaused, GoalReached, NoPath, PathfindingAgent, SetDestination};
pub use error::NavError;
pub use follower::{FollowerState, PathFollower, Step};
pub use mesh::{Edge, Face, FaceIndex, MeshSource, TriangleMesh};
pub use navigation::{NavGraph, NodeId};
pub use path::Path;
pub use pathfinding::PathFinder;
pub use surface::NavSurface;

#[derive(Debug, Clone, PartialEq, Eq, Hash, SystemLabel)]
pub enum NavigatorSystem {
    ComputePaths,
    MoveFollowers,
}

#[derive(Default, Clone, Copy)]
pub struct NavigatorPlugin {
    pub initialize_on_startup: bool,
}

impl NavigatorPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initialize_on_startup(mut self, initialize_on_startup: bool) -> Self {
        self.initialize_on_startup = initialize_on_startup;
        self
    }
}

impl Plugin for NavigatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GoalReached>()
            .add_system(compute_requested_paths.label(NavigatorSystem::ComputePaths))
            .add_system(
                move_followers
                    .label(NavigatorSystem::MoveFollowers)
                    .after(NavigatorSystem::ComputePaths),
            )
            .register_type::<PathfindingAgent>()
            .register_type::<SetDestination>()
            .register_type::<PathFollower>()
            .register_type::<FollowerState>()
            .register_type::<Path>();

        if self.initialize_on_startup {
            app.add_startup_system(initialize_surface);
        }
    }
}
