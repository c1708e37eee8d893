use bevy_ecs::component::Component;
use bevy_math::Vec3;
use bevy_reflect::{FromReflect, Reflect};

use crate::{NavError, Path};

#[derive(Debug, Reflect, FromReflect, Clone, Copy, PartialEq, Eq)]
pub enum FollowerState {
    Idle,
    Following,
}

impl Default for FollowerState {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Moved(Vec3),
    ReachedGoal(Vec3),
}

impl Step {
    pub fn position(self) -> Vec3 {
        match self {
            Self::Moved(position) | Self::ReachedGoal(position) => position,
        }
    }
}

/// `speed` is in segments per second, whatever the segment length.
#[derive(Debug, Reflect, FromReflect, Component, Clone)]
pub struct PathFollower {
    speed: f32,
    path: Option<Path>,
    segment: usize,
    progress: f32,
    state: FollowerState,
    reached_goal: bool,
}

impl Default for PathFollower {
    fn default() -> Self {
        Self {
            speed: 1.0,
            path: None,
            segment: 0,
            progress: 0.0,
            state: FollowerState::default(),
            reached_goal: false,
        }
    }
}

impl PathFollower {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[inline(always)]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    #[inline(always)]
    pub fn state(&self) -> FollowerState {
        self.state
    }

    #[inline(always)]
    pub fn is_following(&self) -> bool {
        self.state == FollowerState::Following
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    #[inline(always)]
    pub fn segment_index(&self) -> usize {
        self.segment
    }

    #[inline(always)]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline(always)]
    pub fn has_reached_goal(&self) -> bool {
        self.reached_goal
    }

    pub fn assign(&mut self, path: Path) -> Result<(), NavError> {
        if path.is_empty() {
            return Err(NavError::EmptyPath);
        }

        self.path = Some(path);
        self.segment = 0;
        self.progress = 0.0;
        self.state = FollowerState::Following;
        self.reached_goal = false;
        Ok(())
    }

    /// The sampled position is not clamped, so the tick finishing a segment may overshoot it.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<Step> {
        if self.state != FollowerState::Following {
            return None;
        }
        let path = self.path.as_ref()?;
        let segment_count = path.segment_count();

        let (from, to) = match path.segment(self.segment) {
            Some(segment) => segment,
            None => {
                // A single point has no segments; arrive immediately.
                let position = path.last()?;
                self.finish();
                return Some(Step::ReachedGoal(position));
            }
        };
        self.progress += delta_seconds * self.speed;
        let position = from.lerp(to, self.progress);

        if self.progress >= 1.0 {
            self.progress = 0.0;
            self.segment += 1;
        }

        if self.segment == segment_count {
            self.finish();
            return Some(Step::ReachedGoal(position));
        }
        Some(Step::Moved(position))
    }

    fn finish(&mut self) {
        self.state = FollowerState::Idle;
        self.reached_goal = true;
    }
}
