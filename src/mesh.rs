use bevy_math::Vec3;
use bevy_utils::HashMap;

pub type FaceIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    #[inline(always)]
    pub fn undirected(self) -> (u32, u32) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    indexes: Vec<u32>,
}

impl Face {
    pub fn new(indexes: impl Into<Vec<u32>>) -> Self {
        Self {
            indexes: indexes.into(),
        }
    }

    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self::new([a, b, c])
    }

    #[inline(always)]
    pub fn indexes(&self) -> &[u32] {
        &self.indexes
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let count = self.indexes.len();
        (0..count).map(move |i| Edge::new(self.indexes[i], self.indexes[(i + 1) % count]))
    }
}

pub trait MeshSource {
    fn faces(&self) -> &[Face];

    fn positions(&self) -> &[Vec3];

    /// May include `face` itself.
    fn neighbors_across_edge(&self, face: FaceIndex, edge: Edge) -> Vec<(FaceIndex, Edge)>;
}

/// Faces are neighbors only when their edges share vertex indices, not just positions.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    faces: Vec<Face>,
    edge_faces: HashMap<(u32, u32), Vec<(FaceIndex, Edge)>>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vec3>, faces: Vec<Face>) -> Self {
        let mut edge_faces: HashMap<(u32, u32), Vec<(FaceIndex, Edge)>> =
            HashMap::with_capacity(faces.len() * 3);
        for (face_index, face) in faces.iter().enumerate() {
            for edge in face.edges() {
                edge_faces
                    .entry(edge.undirected())
                    .or_default()
                    .push((face_index, edge));
            }
        }

        Self {
            positions,
            faces,
            edge_faces,
        }
    }

    pub fn from_triangles(positions: Vec<Vec3>, triangles: &[[u32; 3]]) -> Self {
        let faces = triangles
            .iter()
            .map(|[a, b, c]| Face::triangle(*a, *b, *c))
            .collect();
        Self::new(positions, faces)
    }

    /// Flat XZ grid, row by row, each cell split along its rising diagonal.
    pub fn grid(columns: u32, rows: u32, cell_size: f32) -> Self {
        let stride = columns + 1;
        let mut positions = Vec::with_capacity((stride * (rows + 1)) as usize);
        for z in 0..=rows {
            for x in 0..=columns {
                positions.push(Vec3::new(x as f32 * cell_size, 0.0, z as f32 * cell_size));
            }
        }

        let mut triangles = Vec::with_capacity((columns * rows * 2) as usize);
        for z in 0..rows {
            for x in 0..columns {
                let a = z * stride + x;
                let b = a + 1;
                let c = b + stride;
                let d = a + stride;
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }

        Self::from_triangles(positions, &triangles)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl MeshSource for TriangleMesh {
    fn faces(&self) -> &[Face] {
        &self.faces
    }

    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn neighbors_across_edge(&self, _face: FaceIndex, edge: Edge) -> Vec<(FaceIndex, Edge)> {
        self.edge_faces
            .get(&edge.undirected())
            .cloned()
            .unwrap_or_default()
    }
}
