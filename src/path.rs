use bevy_math::Vec3;
use bevy_reflect::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Reflect, FromReflect)]
pub struct Path {
    points: Vec<Vec3>,
}

impl Path {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    #[inline(always)]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    pub fn segment(&self, index: usize) -> Option<(Vec3, Vec3)> {
        Some((*self.points.get(index)?, *self.points.get(index + 1)?))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

impl From<Vec<Vec3>> for Path {
    fn from(points: Vec<Vec3>) -> Self {
        Self::new(points)
    }
}
