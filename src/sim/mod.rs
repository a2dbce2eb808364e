//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (controlled actor first)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod grid;
pub mod input;
pub mod particles;
pub mod policy;
pub mod sensor;
pub mod state;
pub mod tick;
pub mod trail;
pub mod turn;

pub use actor::{
    Actor, ActorId, ActorTelemetry, ColorTag, Controls, DeathCause, Heading, SpeedLevel,
    SpeedProfile,
};
pub use collision::{
    Aabb, CollisionOutcome, check_cell_collision, ray_aabb_distance, ray_boundary_distance,
};
pub use grid::{Cell, OccupancyGrid};
pub use input::{ActionState, InputLatch};
pub use particles::{Particle, ParticleInstance, ParticlePool};
pub use policy::{
    Autopilot, Decision, DecisionPolicy, Policy, PolicyInput, PursuitConfig, PursuitPolicy,
    SurvivalConfig, SurvivalPolicy, ThinkCadence,
};
pub use sensor::{Obstacle, ObstacleKind, SensorArray, SensorReadings};
pub use state::{GamePhase, GameState, MatchSummary, SimEvent};
pub use tick::{TickInput, run_frame, tick};
pub use trail::{Trail, TrailSegment};
pub use turn::{BufferState, SimClock, TurnAction, TurnBuffer, TurnResolution};
