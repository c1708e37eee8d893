use bevy_math::Vec3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    #[error("face {face} has {vertex_count} vertices, expected a triangle")]
    InvalidFace { face: usize, vertex_count: usize },
    #[error("face {face} references vertex {index} but only {position_count} positions exist")]
    VertexOutOfBounds {
        face: usize,
        index: u32,
        position_count: usize,
    },
    #[error("face {face} is not part of a mesh with {face_count} faces")]
    UnknownFace { face: usize, face_count: usize },
    #[error("navigation graph has no nodes")]
    EmptyGraph,
    #[error("no path between nodes {start} and {goal}")]
    DisconnectedPath { start: Vec3, goal: Vec3 },
    #[error("cannot follow an empty path")]
    EmptyPath,
}
