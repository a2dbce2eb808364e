//! Collision detection on the movement grid, plus ray queries for sensors
//!
//! Actor collisions are cell based: the continuous position is rounded to a
//! cell, checked against the arena bounds first and the occupancy grid second.
//! Ray queries work on axis-aligned boxes and the analytic arena boundary.

use glam::Vec2;

use super::grid::{Cell, OccupancyGrid};

/// Directions closer to parallel than this never reach a boundary plane
const PARALLEL_EPSILON: f32 = 0.001;

/// Result of one actor's per-frame collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Still in the cell written last frame; nothing checked
    SameCell,
    /// Entered a free cell, which is now occupied
    Entered(Cell),
    /// Rounded position is outside the arena
    OutOfBounds(Cell),
    /// Entered a cell already on a trail
    Trail(Cell),
}

impl CollisionOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, CollisionOutcome::OutOfBounds(_) | CollisionOutcome::Trail(_))
    }
}

/// Check an actor position against the arena bounds and the grid
///
/// The boundary test runs first and short-circuits, so out-of-range cells are
/// never looked up or inserted. A free cell is inserted as a side effect.
pub fn check_cell_collision(
    pos: Vec2,
    last_cell: Option<Cell>,
    grid: &mut OccupancyGrid,
    half_extent: f32,
) -> CollisionOutcome {
    let cell = Cell::from_position(pos);

    if cell.is_out_of_bounds(half_extent) {
        return CollisionOutcome::OutOfBounds(cell);
    }

    if last_cell == Some(cell) {
        return CollisionOutcome::SameCell;
    }

    if grid.is_occupied(cell) {
        return CollisionOutcome::Trail(cell);
    }

    grid.occupy(cell);
    CollisionOutcome::Entered(cell)
}

/// Axis-aligned box on the arena plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box around a center with the given half extents
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self::new(center - half, center + half)
    }

    /// Box around an axis-aligned segment, widened by `half_width` on all sides
    pub fn around_segment(start: Vec2, end: Vec2, half_width: f32) -> Self {
        let pad = Vec2::splat(half_width);
        Self::new(start.min(end) - pad, start.max(end) + pad)
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Distance along a unit ray to the first intersection with a box
///
/// Slab method. Returns `None` on a miss, and also when the origin sits inside
/// or on the box.
pub fn ray_aabb_distance(origin: Vec2, dir: Vec2, aabb: &Aabb) -> Option<f32> {
    if aabb.contains(origin) {
        return None;
    }

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for (o, d, lo, hi) in [
        (origin.x, dir.x, aabb.min.x, aabb.max.x),
        (origin.y, dir.y, aabb.min.y, aabb.max.y),
    ] {
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    if t_near > t_far || t_far < 0.0 || t_near < 0.0 {
        return None;
    }
    Some(t_near)
}

/// Distance along a ray to the nearest of the four arena boundary planes
///
/// Solves `t = (limit - origin) / direction` per plane and keeps the smallest
/// positive `t`.
pub fn ray_boundary_distance(origin: Vec2, dir: Vec2, half_extent: f32) -> Option<f32> {
    let mut best: Option<f32> = None;
    let mut check_plane = |limit: f32, o: f32, d: f32| {
        if d.abs() < PARALLEL_EPSILON {
            return;
        }
        let t = (limit - o) / d;
        if t > 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    check_plane(half_extent, origin.x, dir.x);
    check_plane(-half_extent, origin.x, dir.x);
    check_plane(half_extent, origin.y, dir.y);
    check_plane(-half_extent, origin.y, dir.y);

    best
}
