//! Distance probes for the autonomous actor
//!
//! Five rays fan out from the actor relative to its heading. Each reading is
//! the nearer of the first obstacle hit and the arena boundary, capped at the
//! sensing range. A miss reads as the cap; there is no separate "no hit" value.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{ActorId, Heading};
use super::collision::{Aabb, ray_aabb_distance, ray_boundary_distance};
use crate::consts::ARENA_HALF_EXTENT;
use crate::rotate_on_plane;

/// What kind of geometry an obstacle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Trail,
    Body,
}

/// Collidable geometry visible to sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub owner: ActorId,
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

/// One distance per probe direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    pub front: f32,
    pub left: f32,
    pub right: f32,
    pub diag_left: f32,
    pub diag_right: f32,
}

impl SensorReadings {
    /// Every probe reading the same distance
    pub fn uniform(distance: f32) -> Self {
        Self {
            front: distance,
            left: distance,
            right: distance,
            diag_left: distance,
            diag_right: distance,
        }
    }
}

/// Probe angles relative to the heading; positive is to the left
pub const PROBE_ANGLES: [f32; 5] = [0.0, FRAC_PI_2, -FRAC_PI_2, FRAC_PI_4, -FRAC_PI_4];

/// Raycasting sensor with a maximum range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorArray {
    pub max_range: f32,
    pub half_extent: f32,
}

impl SensorArray {
    pub fn new(max_range: f32) -> Self {
        Self {
            max_range,
            half_extent: ARENA_HALF_EXTENT,
        }
    }

    /// Probe from `origin` along the five directions around `heading`
    ///
    /// The owner's own body is skipped. Boxes that contain the origin are
    /// skipped too, which keeps the owner's live trail segment out of the
    /// readings.
    pub fn scan(
        &self,
        origin: Vec2,
        heading: Heading,
        owner: ActorId,
        obstacles: &[Obstacle],
    ) -> SensorReadings {
        let forward = heading.vector();
        let [front, left, right, diag_left, diag_right] = PROBE_ANGLES
            .map(|angle| self.probe(origin, rotate_on_plane(forward, angle), owner, obstacles));

        SensorReadings {
            front,
            left,
            right,
            diag_left,
            diag_right,
        }
    }

    /// Single ray reading, capped at `max_range`
    pub fn probe(&self, origin: Vec2, dir: Vec2, owner: ActorId, obstacles: &[Obstacle]) -> f32 {
        let nearest_obstacle = obstacles
            .iter()
            .filter(|o| !(o.owner == owner && o.kind == ObstacleKind::Body))
            .filter_map(|o| ray_aabb_distance(origin, dir, &o.bounds))
            .fold(f32::INFINITY, f32::min);

        let boundary =
            ray_boundary_distance(origin, dir, self.half_extent).unwrap_or(f32::INFINITY);

        nearest_obstacle.min(boundary).min(self.max_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(owner: ActorId, a: (f32, f32), b: (f32, f32)) -> Obstacle {
        Obstacle {
            owner,
            kind: ObstacleKind::Trail,
            bounds: Aabb::around_segment(Vec2::new(a.0, a.1), Vec2::new(b.0, b.1), 0.1),
        }
    }

    #[test]
    fn test_open_arena_reads_boundaries() {
        let sensors = SensorArray::new(200.0);
        let r = sensors.scan(Vec2::new(-10.0, 80.0), Heading::North, ActorId::Autonomous, &[]);
        assert!((r.front - 180.0).abs() < 1e-3);
        assert!((r.left - 90.0).abs() < 1e-3);
        assert!((r.right - 110.0).abs() < 1e-3);
        // Diagonal left reaches x = -100 first
        assert!((r.diag_left - 90.0 * std::f32::consts::SQRT_2).abs() < 1e-2);
    }

    #[test]
    fn test_readings_capped_at_range() {
        let sensors = SensorArray::new(80.0);
        let r = sensors.scan(Vec2::ZERO, Heading::East, ActorId::Autonomous, &[]);
        assert_eq!(r, SensorReadings::uniform(80.0));
    }

    #[test]
    fn test_obstacle_closer_than_boundary() {
        let sensors = SensorArray::new(200.0);
        let obstacles = [wall(ActorId::Controlled, (-5.0, -12.0), (5.0, -12.0))];
        let r = sensors.scan(Vec2::ZERO, Heading::North, ActorId::Autonomous, &obstacles);
        assert!((r.front - 11.9).abs() < 1e-4);
        assert!((r.left - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_own_body_and_live_segment_ignored() {
        let sensors = SensorArray::new(200.0);
        let body = Obstacle {
            owner: ActorId::Autonomous,
            kind: ObstacleKind::Body,
            bounds: Aabb::from_center(Vec2::new(0.0, -3.0), Vec2::splat(0.5)),
        };
        let live = wall(ActorId::Autonomous, (0.0, 30.0), (0.0, 0.0));
        let r = sensors.scan(Vec2::ZERO, Heading::North, ActorId::Autonomous, &[body, live]);
        assert!((r.front - 100.0).abs() < 1e-3);
        assert!((r.left - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_opponent_body_is_seen() {
        let sensors = SensorArray::new(200.0);
        let body = Obstacle {
            owner: ActorId::Controlled,
            kind: ObstacleKind::Body,
            bounds: Aabb::from_center(Vec2::new(-8.0, 0.0), Vec2::new(0.5, 0.25)),
        };
        let r = sensors.scan(Vec2::ZERO, Heading::North, ActorId::Autonomous, &[body]);
        assert!((r.left - 7.5).abs() < 1e-4);
    }
}
