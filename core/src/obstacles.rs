//! Static blocking volumes.
//!
//! Every query is a linear scan: O(n) in the obstacle count. The site has a few
//! hundred boxes at most, so there is no spatial index.

use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;

/// What an obstacle is, for logging and debugging only. Every kind blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Pillar,
    Furniture,
    Vehicle,
    SignPost,
    TreeTrunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(bounds: Aabb, kind: ObstacleKind) -> Self {
        Self { bounds, kind }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// True if `volume` overlaps any obstacle.
    #[inline]
    pub fn blocks(&self, volume: &Aabb) -> bool {
        self.first_blocking(volume).is_some()
    }

    /// The first obstacle (in insertion order) overlapping `volume`.
    pub fn first_blocking(&self, volume: &Aabb) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.bounds.intersects(volume))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
