//! Light-wall trail geometry
//!
//! The grid decides collisions; these segments are what the renderer draws
//! and what the sensors see. A segment starts at spawn and at every executed
//! turn, and its end follows the actor until the next turn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::TRAIL_HALF_WIDTH;

/// One straight run of wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl TrailSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around_segment(self.start, self.end, TRAIL_HALF_WIDTH)
    }
}

/// All wall segments laid by one actor
#[derive(Debug, Clone, Default)]
pub struct Trail {
    segments: Vec<TrailSegment>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new segment at `pos`
    pub fn start_segment(&mut self, pos: Vec2) {
        self.segments.push(TrailSegment { start: pos, end: pos });
    }

    /// Stretch the live segment to `pos`
    pub fn extend_to(&mut self, pos: Vec2) {
        if let Some(live) = self.segments.last_mut() {
            live.end = pos;
        }
    }

    pub fn segments(&self) -> &[TrailSegment] {
        &self.segments
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Total wall length
    pub fn length(&self) -> f32 {
        self.segments.iter().map(TrailSegment::length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_moves_only_live_segment() {
        let mut trail = Trail::new();
        trail.start_segment(Vec2::new(0.0, 10.0));
        trail.extend_to(Vec2::new(0.0, 4.0));
        trail.start_segment(Vec2::new(0.0, 4.0));
        trail.extend_to(Vec2::new(-3.0, 4.0));

        let segs = trail.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].end, Vec2::new(0.0, 4.0));
        assert_eq!(segs[1].end, Vec2::new(-3.0, 4.0));
        assert!((trail.length() - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_extend_without_segment_is_noop() {
        let mut trail = Trail::new();
        trail.extend_to(Vec2::ONE);
        assert!(trail.segments().is_empty());
    }

    #[test]
    fn test_bounds_are_padded() {
        let seg = TrailSegment {
            start: Vec2::new(0.0, 10.0),
            end: Vec2::new(0.0, 4.0),
        };
        let b = seg.bounds();
        assert!((b.min.x + TRAIL_HALF_WIDTH).abs() < 1e-6);
        assert!((b.max.y - (10.0 + TRAIL_HALF_WIDTH)).abs() < 1e-6);
    }
}
