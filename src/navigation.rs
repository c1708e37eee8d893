use bevy_math::Vec3;
use bevy_utils::{tracing::info, HashMap};

use crate::{
    mesh::{Face, FaceIndex, MeshSource},
    NavError, Path, PathFinder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

type NodeKey = [u32; 3];

#[inline(always)]
fn node_key(location: Vec3) -> NodeKey {
    // Adding zero folds -0.0 into 0.0 so both hash to the same node.
    let location = location + Vec3::ZERO;
    [
        location.x.to_bits(),
        location.y.to_bits(),
        location.z.to_bits(),
    ]
}

/// One node per triangle centroid, linked both ways across shared edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavGraph {
    nodes: Vec<Vec3>,
    neighbors: Vec<Vec<NodeId>>,
    lookup: HashMap<NodeKey, NodeId>,
}

impl NavGraph {
    pub fn build<M: MeshSource + ?Sized>(mesh: &M) -> Result<Self, NavError> {
        let faces = mesh.faces();
        let positions = mesh.positions();
        let mut graph = Self::with_capacity(faces.len());

        // All faces are validated before any connection is made, and node ids follow face order.
        let face_nodes = faces
            .iter()
            .enumerate()
            .map(|(face_index, face)| {
                centroid(positions, face_index, face).map(|location| graph.insert_node(location))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (face_index, face) in faces.iter().enumerate() {
            let node = face_nodes[face_index];
            for edge in face.edges() {
                for (neighbor_index, _) in mesh.neighbors_across_edge(face_index, edge) {
                    if neighbor_index == face_index {
                        continue;
                    }
                    let neighbor =
                        *face_nodes
                            .get(neighbor_index)
                            .ok_or(NavError::UnknownFace {
                                face: neighbor_index,
                                face_count: faces.len(),
                            })?;
                    graph.connect(node, neighbor);
                }
            }
        }

        info!(
            "Built nav graph: {} nodes, {} connections from {} faces",
            graph.len(),
            graph.connection_count(),
            faces.len()
        );
        Ok(graph)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            neighbors: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    fn insert_node(&mut self, location: Vec3) -> NodeId {
        let next = NodeId(self.nodes.len() as u32);
        let id = *self.lookup.entry(node_key(location)).or_insert(next);
        if id == next {
            self.nodes.push(location);
            self.neighbors.push(Vec::new());
        }
        id
    }

    fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        if !self.neighbors[a.index()].contains(&b) {
            self.neighbors[a.index()].push(b);
        }
        if !self.neighbors[b.index()].contains(&a) {
            self.neighbors[b.index()].push(a);
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    pub fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn location(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id.index()).copied()
    }

    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.neighbors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn node_at(&self, location: Vec3) -> Option<NodeId> {
        self.lookup.get(&node_key(location)).copied()
    }

    pub fn connection_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn is_symmetric(&self) -> bool {
        self.node_ids().all(|a| {
            self.neighbors(a)
                .iter()
                .all(|b| self.neighbors(*b).contains(&a))
        })
    }

    // Ties go to the node built first.
    pub fn nearest_node(&self, point: Vec3) -> Result<NodeId, NavError> {
        let mut nearest = None;
        let mut nearest_dist = f32::MAX;
        for (index, location) in self.nodes.iter().enumerate() {
            let dist = location.distance(point);
            if dist < nearest_dist || nearest.is_none() {
                nearest_dist = dist;
                nearest = Some(NodeId(index as u32));
            }
        }
        nearest.ok_or(NavError::EmptyGraph)
    }

    pub fn nearest_point(&self, point: Vec3) -> Result<Vec3, NavError> {
        self.nearest_node(point).map(|id| self.nodes[id.index()])
    }

    pub fn find_path(&self, start: Vec3, goal: Vec3) -> Result<Path, NavError> {
        PathFinder::new(self).find_path(start, goal)
    }
}

fn centroid(positions: &[Vec3], face_index: FaceIndex, face: &Face) -> Result<Vec3, NavError> {
    let indexes = face.indexes();
    if indexes.len() != 3 {
        return Err(NavError::InvalidFace {
            face: face_index,
            vertex_count: indexes.len(),
        });
    }

    let mut sum = Vec3::ZERO;
    for index in indexes {
        sum += *positions
            .get(*index as usize)
            .ok_or(NavError::VertexOutOfBounds {
                face: face_index,
                index: *index,
                position_count: positions.len(),
            })?;
    }
    Ok(sum / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Edge, TriangleMesh};

    /// Reports each neighbor only from the lower face index.
    struct OneWayMesh(TriangleMesh);

    impl MeshSource for OneWayMesh {
        fn faces(&self) -> &[Face] {
            self.0.faces()
        }

        fn positions(&self) -> &[Vec3] {
            self.0.positions()
        }

        fn neighbors_across_edge(&self, face: FaceIndex, edge: Edge) -> Vec<(FaceIndex, Edge)> {
            self.0
                .neighbors_across_edge(face, edge)
                .into_iter()
                .filter(|(other, _)| *other > face)
                .collect()
        }
    }

    fn quad() -> TriangleMesh {
        TriangleMesh::from_triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 3.0),
                Vec3::new(0.0, 0.0, 3.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    pub fn test_centroid_nodes() {
        let graph = NavGraph::build(&quad()).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[0], Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(graph.nodes()[1], Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(graph.neighbors(NodeId(0)), &[NodeId(1)]);
        assert_eq!(graph.neighbors(NodeId(1)), &[NodeId(0)]);
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    pub fn test_grid_neighbors_and_symmetry() {
        let graph = NavGraph::build(&TriangleMesh::grid(4, 3, 1.0)).unwrap();
        assert_eq!(graph.len(), 24);
        assert!(graph.is_symmetric());
        for id in graph.node_ids() {
            let count = graph.neighbors(id).len();
            assert!((1..=3).contains(&count), "node {id:?} has {count} neighbors");
        }
        // Interior triangles touch three others, the lower-left corner only its partner and one more.
        assert_eq!(graph.neighbors(NodeId(0)).len(), 2);
        assert_eq!(graph.neighbors(NodeId(11)).len(), 3);
    }

    #[test]
    pub fn test_one_way_adjacency_is_mirrored() {
        let graph = NavGraph::build(&OneWayMesh(TriangleMesh::grid(3, 3, 1.0))).unwrap();
        let reference = NavGraph::build(&TriangleMesh::grid(3, 3, 1.0)).unwrap();
        assert!(graph.is_symmetric());
        for id in graph.node_ids() {
            let mut built = graph.neighbors(id).to_vec();
            let mut expected = reference.neighbors(id).to_vec();
            built.sort();
            expected.sort();
            assert_eq!(built, expected);
        }
    }

    #[test]
    pub fn test_rejects_non_triangle() {
        let mesh = TriangleMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE],
            vec![Face::triangle(0, 1, 2), Face::new([0, 1, 3, 2])],
        );
        assert_eq!(
            NavGraph::build(&mesh),
            Err(NavError::InvalidFace {
                face: 1,
                vertex_count: 4
            })
        );
    }

    #[test]
    pub fn test_rejects_missing_vertex() {
        let mesh = TriangleMesh::from_triangles(vec![Vec3::ZERO, Vec3::X], &[[0, 1, 2]]);
        assert_eq!(
            NavGraph::build(&mesh),
            Err(NavError::VertexOutOfBounds {
                face: 0,
                index: 2,
                position_count: 2
            })
        );
    }

    #[test]
    pub fn test_shared_centroid_collapses() {
        let mesh = TriangleMesh::from_triangles(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            &[[0, 1, 2], [0, 2, 1]],
        );
        let graph = NavGraph::build(&mesh).unwrap();
        assert_eq!(graph.len(), 1);
        assert!(graph.neighbors(NodeId(0)).is_empty());
    }

    #[test]
    pub fn test_build_is_repeatable() {
        let mesh = TriangleMesh::grid(5, 5, 0.5);
        let first = NavGraph::build(&mesh).unwrap();
        let second = NavGraph::build(&mesh).unwrap();
        assert_eq!(first.nodes(), second.nodes());
        for id in first.node_ids() {
            assert_eq!(first.neighbors(id), second.neighbors(id));
        }
    }

    #[test]
    pub fn test_nearest_node() {
        let graph = NavGraph::build(&quad()).unwrap();
        assert_eq!(graph.nearest_node(Vec3::new(2.9, 0.0, 0.1)), Ok(NodeId(0)));
        assert_eq!(graph.nearest_node(Vec3::new(0.2, 5.0, 2.9)), Ok(NodeId(1)));
        // Both centroids are equally far from the diagonal's midpoint.
        assert_eq!(graph.nearest_node(Vec3::new(1.5, 0.0, 1.5)), Ok(NodeId(0)));

        let grid = NavGraph::build(&TriangleMesh::grid(6, 6, 1.0)).unwrap();
        for point in [Vec3::new(-4.0, 1.0, 2.0), Vec3::new(2.2, -3.0, 5.5)] {
            let location = grid.nearest_point(point).unwrap();
            assert!(grid.node_at(location).is_some());
        }
    }

    #[test]
    pub fn test_empty_graph() {
        let graph = NavGraph::build(&TriangleMesh::default()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.nearest_node(Vec3::ZERO), Err(NavError::EmptyGraph));
    }
}
