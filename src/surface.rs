use bevy_ecs::system::Resource;
use bevy_math::Vec3;

use crate::{mesh::MeshSource, NavError, NavGraph, Path, PathFinder};

/// Owns the walkable mesh and builds its [`NavGraph`] once, on first use.
#[derive(Resource)]
pub struct NavSurface {
    mesh: Box<dyn MeshSource + Send + Sync>,
    graph: Option<NavGraph>,
}

impl NavSurface {
    pub fn new(mesh: impl MeshSource + Send + Sync + 'static) -> Self {
        Self {
            mesh: Box::new(mesh),
            graph: None,
        }
    }

    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.graph.is_some()
    }

    pub fn graph(&self) -> Option<&NavGraph> {
        self.graph.as_ref()
    }

    pub fn initialize(&mut self) -> Result<&NavGraph, NavError> {
        let graph = match self.graph.take() {
            Some(graph) => graph,
            None => NavGraph::build(self.mesh.as_ref())?,
        };
        let graph: &NavGraph = self.graph.insert(graph);
        Ok(graph)
    }

    pub fn request_path(&mut self, start: Vec3, goal: Vec3) -> Result<Path, NavError> {
        PathFinder::new(self.initialize()?).find_path(start, goal)
    }

    pub fn nearest_point(&mut self, point: Vec3) -> Result<Vec3, NavError> {
        self.initialize()?.nearest_point(point)
    }
}
