//! Light-cycle arena - simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, actors, sensors, agents, particles)
//! - `settings`: Match configuration and policy tuning

pub mod settings;
pub mod sim;

pub use settings::{AgentKind, Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena half-extent on both axes
    pub const ARENA_HALF_EXTENT: f32 = 100.0;

    /// Speed levels (units/s)
    pub const CRUISE_SPEED: f32 = 20.0;
    pub const BOOST_SPEED: f32 = 30.0;
    pub const BRAKE_SPEED: f32 = 10.0;

    /// Boost budget, does not regenerate
    pub const MAX_BOOST_ENERGY: f32 = 100.0;
    /// Boost energy drained per second of boosting
    pub const BOOST_DRAIN_PER_SEC: f32 = 30.0;

    /// Pending turn lifetime (seconds of simulation time)
    pub const TURN_BUFFER_WINDOW: f64 = 0.150;
    /// Max distance from a grid line at which a turn may execute
    pub const SNAP_TOLERANCE: f32 = 0.4;

    /// Trail wall lateral half-width (sensor geometry only)
    pub const TRAIL_HALF_WIDTH: f32 = 0.1;
    /// Actor body footprint: half length along heading, half width across it
    pub const BODY_HALF_LENGTH: f32 = 0.5;
    pub const BODY_HALF_WIDTH: f32 = 0.25;

    /// Explosion pool
    pub const PARTICLE_POOL_CAPACITY: usize = 500;
    pub const PARTICLES_PER_BURST: usize = 80;

    /// Match flow
    pub const COUNTDOWN_SECS: f32 = 3.0;
    pub const SCORE_PER_SEC: f32 = 10.0;
    pub const VICTORY_BONUS: f32 = 1000.0;

    /// Start line
    pub const CONTROLLED_START: (f32, f32) = (-10.0, 80.0);
    pub const AUTONOMOUS_START: (f32, f32) = (10.0, 80.0);

    /// Color tags
    pub const CONTROLLED_COLOR: u32 = 0x00FFFF;
    pub const AUTONOMOUS_COLOR: u32 = 0xFF0000;
    /// Autonomous actor color when the pursuit agent drives it
    pub const PURSUIT_COLOR: u32 = 0xFF4400;
}

/// Rotate a plane direction about the vertical axis.
///
/// Positive angles turn toward the actor's left: North `(0, -1)` rotated by
/// +90 degrees is West `(-1, 0)`. The `y` component of plane vectors is the
/// world z axis.
#[inline]
pub fn rotate_on_plane(dir: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(dir.x * cos + dir.y * sin, -dir.x * sin + dir.y * cos)
}

/// Distance from `value` to the nearest integer
#[inline]
pub fn distance_to_grid_line(value: f32) -> f32 {
    (value - value.round()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_left_from_north_is_west() {
        let west = rotate_on_plane(Vec2::new(0.0, -1.0), FRAC_PI_2);
        assert!((west.x + 1.0).abs() < 1e-6);
        assert!(west.y.abs() < 1e-6);
    }

    #[test]
    fn test_distance_to_grid_line() {
        assert!((distance_to_grid_line(4.1) - 0.1).abs() < 1e-5);
        assert!((distance_to_grid_line(-3.75) - 0.25).abs() < 1e-5);
        assert_eq!(distance_to_grid_line(7.0), 0.0);
    }
}
