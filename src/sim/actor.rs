//! Light-cycle actors
//!
//! An actor moves kinematically along one cardinal axis at one of three fixed
//! speeds, turns only on grid lines, and writes its trail into the shared
//! occupancy grid until it dies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, CollisionOutcome, check_cell_collision};
use super::grid::{Cell, OccupancyGrid};
use super::trail::Trail;
use super::turn::{TurnAction, TurnBuffer, TurnResolution};
use crate::consts::*;
use crate::distance_to_grid_line;

/// Which of the two match actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorId {
    /// Driven by player input
    Controlled,
    /// Driven by a decision policy
    Autonomous,
}

impl ActorId {
    pub fn opponent(self) -> Self {
        match self {
            ActorId::Controlled => ActorId::Autonomous,
            ActorId::Autonomous => ActorId::Controlled,
        }
    }
}

/// Cardinal heading. North is -z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    /// Axis-aligned unit vector on the plane (`y` is world z)
    pub fn vector(self) -> Vec2 {
        match self {
            Heading::North => Vec2::new(0.0, -1.0),
            Heading::South => Vec2::new(0.0, 1.0),
            Heading::East => Vec2::new(1.0, 0.0),
            Heading::West => Vec2::new(-1.0, 0.0),
        }
    }

    pub fn turned(self, action: TurnAction) -> Self {
        match (self, action) {
            (Heading::North, TurnAction::Left) => Heading::West,
            (Heading::North, TurnAction::Right) => Heading::East,
            (Heading::South, TurnAction::Left) => Heading::East,
            (Heading::South, TurnAction::Right) => Heading::West,
            (Heading::West, TurnAction::Left) => Heading::South,
            (Heading::West, TurnAction::Right) => Heading::North,
            (Heading::East, TurnAction::Left) => Heading::North,
            (Heading::East, TurnAction::Right) => Heading::South,
        }
    }

    /// Travel along the z axis
    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}

/// The three discrete speed levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedLevel {
    Cruise,
    Boost,
    Brake,
}

/// Speeds for each level (units/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    pub cruise: f32,
    pub boost: f32,
    pub brake: f32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            cruise: CRUISE_SPEED,
            boost: BOOST_SPEED,
            brake: BRAKE_SPEED,
        }
    }
}

impl SpeedProfile {
    pub fn with_cruise(cruise: f32) -> Self {
        Self {
            cruise,
            ..Self::default()
        }
    }

    pub fn speed(&self, level: SpeedLevel) -> f32 {
        match level {
            SpeedLevel::Cruise => self.cruise,
            SpeedLevel::Boost => self.boost,
            SpeedLevel::Brake => self.brake,
        }
    }
}

/// Held boost/brake state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub boost: bool,
    pub brake: bool,
}

/// 24-bit RGB tag used for the actor, its trail and its explosion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTag(pub u32);

impl ColorTag {
    pub fn to_rgba(self) -> [f32; 4] {
        let r = ((self.0 >> 16) & 0xFF) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xFF) as f32 / 255.0;
        let b = (self.0 & 0xFF) as f32 / 255.0;
        [r, g, b, 1.0]
    }
}

/// Why an actor died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OutOfBounds,
    Trail,
}

/// Read-only per-frame snapshot for UI, camera and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorTelemetry {
    pub id: ActorId,
    pub position: Vec2,
    pub heading: Heading,
    pub speed: f32,
    pub speed_level: SpeedLevel,
    pub boost_energy: f32,
    pub boosting: bool,
    pub braking: bool,
    pub alive: bool,
}

/// A light-cycle
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub pos: Vec2,
    pub heading: Heading,
    pub speeds: SpeedProfile,
    pub speed_level: SpeedLevel,
    pub boost_energy: f32,
    pub controls: Controls,
    pub color: ColorTag,
    pub turn_buffer: TurnBuffer,
    alive: bool,
    died_this_frame: bool,
    last_cell: Option<Cell>,
    trail: Trail,
}

impl Actor {
    pub fn new(id: ActorId, speeds: SpeedProfile, color: ColorTag) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            heading: Heading::North,
            speeds,
            speed_level: SpeedLevel::Cruise,
            boost_energy: MAX_BOOST_ENERGY,
            controls: Controls::default(),
            color,
            turn_buffer: TurnBuffer::new(),
            alive: true,
            died_this_frame: false,
            last_cell: None,
            trail: Trail::new(),
        }
    }

    /// Place the actor on the start line, alive and with a fresh trail
    pub fn spawn(&mut self, start: Vec2, heading: Heading) {
        self.pos = start;
        self.heading = heading;
        self.speed_level = SpeedLevel::Cruise;
        self.boost_energy = MAX_BOOST_ENERGY;
        self.controls = Controls::default();
        self.turn_buffer.clear();
        self.alive = true;
        self.died_this_frame = false;
        self.last_cell = None;
        self.trail.clear();
        self.trail.start_segment(start);
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn last_cell(&self) -> Option<Cell> {
        self.last_cell
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn speed(&self) -> f32 {
        self.speeds.speed(self.speed_level)
    }

    pub fn request_turn(&mut self, action: TurnAction, now: f64) {
        if self.alive {
            self.turn_buffer.request(action, now);
        }
    }

    /// Expire or attempt the buffered turn
    pub fn resolve_turn(&mut self, now: f64) -> TurnResolution {
        if !self.alive {
            return TurnResolution::Idle;
        }
        let mut buffer = self.turn_buffer;
        let resolution = buffer.resolve(now, |action| self.try_turn(action));
        self.turn_buffer = buffer;
        resolution
    }

    /// Turn if the actor is close enough to a grid line along its axis of travel
    ///
    /// On success the position snaps to the nearest cell before the heading
    /// changes, and the trail starts a new segment at the snapped point.
    pub fn try_turn(&mut self, action: TurnAction) -> bool {
        let off_grid = if self.heading.is_vertical() {
            distance_to_grid_line(self.pos.y)
        } else {
            distance_to_grid_line(self.pos.x)
        };

        if off_grid >= SNAP_TOLERANCE {
            return false;
        }

        self.pos = self.pos.round();
        self.heading = self.heading.turned(action);
        self.trail.extend_to(self.pos);
        self.trail.start_segment(self.pos);
        true
    }

    /// Derive this frame's speed level from the controls, draining boost
    pub fn update_speed(&mut self, dt: f32) {
        if self.controls.boost && self.boost_energy > 0.0 {
            self.boost_energy = (self.boost_energy - BOOST_DRAIN_PER_SEC * dt).max(0.0);
            self.speed_level = SpeedLevel::Boost;
        } else if self.controls.brake {
            self.speed_level = SpeedLevel::Brake;
        } else {
            self.speed_level = SpeedLevel::Cruise;
        }
    }

    /// Kinematic step along the heading
    pub fn integrate(&mut self, dt: f32) {
        if self.alive {
            self.pos += self.heading.vector() * self.speed() * dt;
        }
    }

    /// Boundary then grid check; kills the actor on a fatal outcome
    pub fn check_collision(&mut self, grid: &mut OccupancyGrid) -> Option<DeathCause> {
        if !self.alive {
            return None;
        }

        match check_cell_collision(self.pos, self.last_cell, grid, ARENA_HALF_EXTENT) {
            CollisionOutcome::SameCell => None,
            CollisionOutcome::Entered(cell) => {
                self.last_cell = Some(cell);
                None
            }
            CollisionOutcome::OutOfBounds(_) => {
                self.die();
                Some(DeathCause::OutOfBounds)
            }
            CollisionOutcome::Trail(_) => {
                self.die();
                Some(DeathCause::Trail)
            }
        }
    }

    /// Terminal. Returns false if the actor was already dead.
    pub fn die(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.died_this_frame = true;
        self.turn_buffer.clear();
        self.controls = Controls::default();
        true
    }

    /// True once, on the frame the actor died
    pub fn take_death(&mut self) -> bool {
        std::mem::take(&mut self.died_this_frame)
    }

    /// Stretch the live wall segment to the current position
    pub fn update_trail(&mut self) {
        self.trail.extend_to(self.pos);
    }

    /// Footprint on the plane, oriented along the heading
    pub fn body_bounds(&self) -> Aabb {
        let half = if self.heading.is_vertical() {
            Vec2::new(BODY_HALF_WIDTH, BODY_HALF_LENGTH)
        } else {
            Vec2::new(BODY_HALF_LENGTH, BODY_HALF_WIDTH)
        };
        Aabb::from_center(self.pos, half)
    }

    pub fn telemetry(&self) -> ActorTelemetry {
        ActorTelemetry {
            id: self.id,
            position: self.pos,
            heading: self.heading,
            speed: self.speed(),
            speed_level: self.speed_level,
            boost_energy: self.boost_energy,
            boosting: self.speed_level == SpeedLevel::Boost,
            braking: self.speed_level == SpeedLevel::Brake,
            alive: self.alive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_at(x: f32, z: f32, heading: Heading) -> Actor {
        let mut actor = Actor::new(
            ActorId::Controlled,
            SpeedProfile::default(),
            ColorTag(CONTROLLED_COLOR),
        );
        actor.spawn(Vec2::new(x, z), heading);
        actor
    }

    #[test]
    fn test_turn_mapping_is_a_quarter_rotation() {
        for heading in [Heading::North, Heading::South, Heading::East, Heading::West] {
            let left = heading.turned(TurnAction::Left);
            let right = heading.turned(TurnAction::Right);
            let expected_left =
                crate::rotate_on_plane(heading.vector(), std::f32::consts::FRAC_PI_2);
            assert!(left.vector().distance(expected_left) < 1e-5);
            assert_eq!(left.turned(TurnAction::Right), heading);
            assert_eq!(right.turned(TurnAction::Left), heading);
        }
    }

    #[test]
    fn test_turn_snaps_to_cell() {
        let mut actor = actor_at(-10.0, 50.1, Heading::North);
        assert!(actor.try_turn(TurnAction::Left));
        assert_eq!(actor.pos, Vec2::new(-10.0, 50.0));
        assert_eq!(actor.heading, Heading::West);
        assert_eq!(actor.trail().segments().len(), 2);
    }

    #[test]
    fn test_turn_rejected_off_grid() {
        let mut actor = actor_at(-10.0, 50.6, Heading::North);
        assert!(!actor.try_turn(TurnAction::Left));
        assert_eq!(actor.pos, Vec2::new(-10.0, 50.6));
        assert_eq!(actor.heading, Heading::North);
    }

    #[test]
    fn test_lateral_offset_ignored_for_alignment() {
        // Only the axis of travel matters
        let mut actor = actor_at(3.5, 20.0, Heading::South);
        assert!(actor.try_turn(TurnAction::Right));
        assert_eq!(actor.heading, Heading::West);
        assert_eq!(actor.pos.y, 20.0);
    }

    #[test]
    fn test_speed_levels_and_boost_budget() {
        let mut actor = actor_at(0.0, 0.0, Heading::North);
        actor.controls = Controls { boost: true, brake: false };
        actor.update_speed(1.0);
        assert_eq!(actor.speed(), BOOST_SPEED);
        assert!((actor.boost_energy - 70.0).abs() < 1e-4);

        for _ in 0..10 {
            actor.update_speed(1.0);
        }
        assert_eq!(actor.boost_energy, 0.0);
        assert_eq!(actor.speed_level, SpeedLevel::Cruise);

        actor.controls = Controls { boost: true, brake: true };
        actor.update_speed(1.0);
        assert_eq!(actor.speed(), BRAKE_SPEED);
    }

    #[test]
    fn test_death_is_idempotent() {
        let mut actor = actor_at(0.0, 0.0, Heading::North);
        assert!(actor.die());
        assert!(!actor.die());
        assert!(actor.take_death());
        assert!(!actor.take_death());
        assert!(!actor.is_alive());
    }

    #[test]
    fn test_dead_actor_adds_no_cells() {
        let mut grid = OccupancyGrid::new();
        let mut actor = actor_at(0.0, 0.0, Heading::North);
        actor.check_collision(&mut grid);
        assert_eq!(grid.len(), 1);

        actor.die();
        actor.integrate(1.0);
        assert_eq!(actor.check_collision(&mut grid), None);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_color_tag_rgba() {
        assert_eq!(ColorTag(0x00FFFF).to_rgba(), [0.0, 1.0, 1.0, 1.0]);
    }
}
