//! Occupancy grid shared by both actors
//!
//! Append-only during a match; the match state owns it and lends it to the
//! actors for their collision checks.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A discrete grid cell on the arena plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Nearest cell to a continuous plane position
    pub fn from_position(pos: Vec2) -> Self {
        Self {
            x: pos.x.round() as i32,
            z: pos.y.round() as i32,
        }
    }

    /// True when either coordinate lies beyond the arena half-extent
    pub fn is_out_of_bounds(&self, half_extent: f32) -> bool {
        self.x.abs() as f32 > half_extent || self.z.abs() as f32 > half_extent
    }
}

/// Set of cells occupied by trails
#[derive(Debug, Clone, Default)]
pub struct OccupancyGrid {
    cells: HashSet<Cell>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Mark a cell occupied. Returns false if it already was.
    pub fn occupy(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Empty the grid (match reset only)
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}
