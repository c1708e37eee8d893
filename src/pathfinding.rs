use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use bevy_math::Vec3;
use bevy_utils::tracing::debug;

use crate::{navigation::NodeId, NavError, NavGraph, Path};

struct FrontierNode {
    id: NodeId,
    priority: f32,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Every hop costs 1; the frontier is ordered by cost plus the length of the hop taken.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    graph: &'a NavGraph,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a NavGraph) -> Self {
        Self { graph }
    }

    pub fn find_path(&self, start: Vec3, goal: Vec3) -> Result<Path, NavError> {
        let start_node = self.graph.nearest_node(start)?;
        let goal_node = self.graph.nearest_node(goal)?;

        let came_from = self.search(start_node, goal_node);
        let chain = self.reconstruct(&came_from, start_node, goal_node)?;

        let nodes = self.graph.nodes();
        let mut points = Vec::with_capacity(chain.len() + 2);
        points.push(start);
        points.extend(chain.iter().map(|id| nodes[id.index()]));
        points.push(goal);

        debug!(
            "Found path from {} to {} through {} nodes",
            start,
            goal,
            chain.len()
        );
        Ok(Path::new(points))
    }

    fn search(&self, start: NodeId, goal: NodeId) -> Vec<Option<NodeId>> {
        let nodes = self.graph.nodes();
        let mut frontier = BinaryHeap::new();
        let mut came_from: Vec<Option<NodeId>> = vec![None; nodes.len()];
        let mut cost_so_far = vec![u32::MAX; nodes.len()];

        cost_so_far[start.index()] = 0;
        frontier.push(Reverse(FrontierNode {
            id: start,
            priority: 0.0,
        }));

        while let Some(Reverse(current)) = frontier.pop() {
            if current.id == goal {
                break;
            }

            // Only nodes with a recorded cost are ever pushed.
            let current_cost = cost_so_far[current.id.index()];
            let current_location = nodes[current.id.index()];

            for neighbor in self.graph.neighbors(current.id) {
                let new_cost = current_cost + 1;
                if new_cost >= cost_so_far[neighbor.index()] {
                    continue;
                }

                cost_so_far[neighbor.index()] = new_cost;
                came_from[neighbor.index()] = Some(current.id);
                frontier.push(Reverse(FrontierNode {
                    id: *neighbor,
                    priority: new_cost as f32
                        + current_location.distance(nodes[neighbor.index()]),
                }));
            }
        }

        came_from
    }

    /// Nodes after `start` up to and including `goal`.
    fn reconstruct(
        &self,
        came_from: &[Option<NodeId>],
        start: NodeId,
        goal: NodeId,
    ) -> Result<Vec<NodeId>, NavError> {
        let disconnected = || NavError::DisconnectedPath {
            start: self.graph.nodes()[start.index()],
            goal: self.graph.nodes()[goal.index()],
        };

        let mut chain = Vec::new();
        let mut current = goal;
        while current != start {
            // Predecessor costs strictly decrease, so a chain longer than the graph is broken.
            if chain.len() >= came_from.len() {
                return Err(disconnected());
            }
            chain.push(current);
            current = came_from[current.index()].ok_or_else(disconnected)?;
        }
        chain.reverse();
        Ok(chain)
    }
}
