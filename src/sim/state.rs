//! Match state
//!
//! Owns both actors, the occupancy grid, the particle pool, the simulation
//! clock and the seeded RNG. Everything the frame step touches lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{
    Actor, ActorId, ActorTelemetry, ColorTag, DeathCause, Heading, SpeedProfile,
};
use super::particles::ParticlePool;
use super::policy::{Autopilot, DecisionPolicy};
use super::sensor::{Obstacle, ObstacleKind};
use super::turn::SimClock;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No match set up yet
    Idle,
    /// Actors on the start line, counting down
    Countdown,
    /// Active gameplay
    Playing,
    /// Frozen, including the simulation clock
    Paused,
    /// Match decided
    GameOver,
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub score: u64,
    /// Seconds of play survived by the controlled actor
    pub game_time: f32,
    pub max_speed: f32,
    pub victory: bool,
}

/// Outbound notifications, drained by audio/UI/render collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SimEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    Turned { actor: ActorId, heading: Heading },
    ActorDied {
        actor: ActorId,
        position: Vec2,
        color: ColorTag,
        cause: DeathCause,
    },
    MatchOver(MatchSummary),
}

/// Stream offset so the pool and the agents don't share a sequence
const PARTICLE_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub phase: GamePhase,
    /// Seconds of countdown left
    pub countdown: f32,
    pub clock: SimClock,
    pub grid: super::grid::OccupancyGrid,
    pub controlled: Actor,
    pub autonomous: Actor,
    /// Drives the autonomous actor
    pub opponent_pilot: Autopilot,
    /// Drives the controlled actor in idle/demo mode
    pub demo_pilot: Autopilot,
    pub particles: ParticlePool,
    /// Agent decisions (opportunistic turns)
    pub rng: Pcg32,
    pub score: f32,
    pub game_time: f32,
    pub max_speed: f32,
    pub events: Vec<SimEvent>,
    pub(crate) obstacles: Vec<Obstacle>,
    outcome: Option<MatchSummary>,
}

impl GameState {
    pub fn new(settings: Settings) -> Self {
        let controlled = Actor::new(
            ActorId::Controlled,
            SpeedProfile::default(),
            ColorTag(settings.controlled_color),
        );
        let autonomous = Actor::new(
            ActorId::Autonomous,
            SpeedProfile::with_cruise(settings.difficulty.opponent_cruise_speed()),
            settings.agent_kind().color(),
        );

        Self {
            phase: GamePhase::Idle,
            countdown: 0.0,
            clock: SimClock::new(),
            grid: super::grid::OccupancyGrid::new(),
            controlled,
            autonomous,
            opponent_pilot: Autopilot::new(settings.opponent_policy()),
            demo_pilot: Autopilot::new(settings.demo_policy()),
            particles: ParticlePool::new(settings.seed ^ PARTICLE_SEED_OFFSET),
            rng: Pcg32::seed_from_u64(settings.seed),
            score: 0.0,
            game_time: 0.0,
            max_speed: 0.0,
            events: Vec::new(),
            obstacles: Vec::new(),
            outcome: None,
            settings,
        }
    }

    /// Reset everything and put both actors on the start line
    pub fn start(&mut self) {
        self.reset_grid();
        self.particles.clear();
        self.clock.reset();
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.opponent_pilot.reset();
        self.demo_pilot.reset();
        self.score = 0.0;
        self.game_time = 0.0;
        self.max_speed = 0.0;
        self.outcome = None;
        self.events.clear();

        let (cx, cz) = CONTROLLED_START;
        let (ax, az) = AUTONOMOUS_START;
        self.spawn_actor(ActorId::Controlled, Vec2::new(cx, cz), Heading::North);
        self.spawn_actor(ActorId::Autonomous, Vec2::new(ax, az), Heading::North);

        self.countdown = COUNTDOWN_SECS;
        self.set_phase(GamePhase::Countdown);
        log::info!(
            "Match started: {} difficulty, {} agent",
            self.settings.difficulty.as_str(),
            self.opponent_pilot.policy.kind()
        );
    }

    /// Place an actor on the arena, alive with a fresh trail
    pub fn spawn_actor(&mut self, id: ActorId, start: Vec2, heading: Heading) {
        self.actor_mut(id).spawn(start, heading);
    }

    /// Empty the occupancy grid
    pub fn reset_grid(&mut self) {
        self.grid.clear();
    }

    pub fn actor(&self, id: ActorId) -> &Actor {
        match id {
            ActorId::Controlled => &self.controlled,
            ActorId::Autonomous => &self.autonomous,
        }
    }

    pub fn actor_mut(&mut self, id: ActorId) -> &mut Actor {
        match id {
            ActorId::Controlled => &mut self.controlled,
            ActorId::Autonomous => &mut self.autonomous,
        }
    }

    /// Per-actor snapshot, controlled first
    pub fn telemetry(&self) -> [ActorTelemetry; 2] {
        [self.controlled.telemetry(), self.autonomous.telemetry()]
    }

    /// Position of `id`'s opponent if it is still alive
    pub fn live_target_for(&self, id: ActorId) -> Option<Vec2> {
        let opponent = self.actor(id.opponent());
        opponent.is_alive().then_some(opponent.pos)
    }

    /// Refresh the sensor obstacle list: every trail segment plus live bodies
    pub fn refresh_obstacles(&mut self) {
        self.obstacles.clear();
        for actor in [&self.controlled, &self.autonomous] {
            self.obstacles.extend(actor.trail().segments().iter().map(|seg| Obstacle {
                owner: actor.id,
                kind: ObstacleKind::Trail,
                bounds: seg.bounds(),
            }));
            if actor.is_alive() {
                self.obstacles.push(Obstacle {
                    owner: actor.id,
                    kind: ObstacleKind::Body,
                    bounds: actor.body_bounds(),
                });
            }
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Result, once the match is over
    pub fn outcome(&self) -> Option<MatchSummary> {
        self.outcome
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::debug!("Phase {from:?} -> {to:?}");
        self.events.push(SimEvent::PhaseChanged { from, to });
    }

    /// Decide the match and emit the summary
    pub fn finish(&mut self, victory: bool) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if victory {
            self.score += VICTORY_BONUS;
        }
        let summary = MatchSummary {
            score: self.score.floor() as u64,
            game_time: self.game_time,
            max_speed: self.max_speed,
            victory,
        };
        self.outcome = Some(summary);
        self.set_phase(GamePhase::GameOver);
        self.events.push(SimEvent::MatchOver(summary));
        log::info!(
            "Match over: {} (score {}, {:.1}s)",
            if victory { "victory" } else { "defeat" },
            summary.score,
            summary.game_time
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    #[test]
    fn test_start_places_actors_and_counts_down() {
        let mut state = GameState::new(Settings::default());
        assert_eq!(state.phase, GamePhase::Idle);

        state.start();
        assert_eq!(state.phase, GamePhase::Countdown);
        assert_eq!(state.controlled.pos, Vec2::new(-10.0, 80.0));
        assert_eq!(state.autonomous.pos, Vec2::new(10.0, 80.0));
        assert_eq!(state.controlled.heading, Heading::North);
        assert!(state.grid.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![SimEvent::PhaseChanged {
                from: GamePhase::Idle,
                to: GamePhase::Countdown
            }]
        );
    }

    #[test]
    fn test_difficulty_sets_opponent_speed() {
        let state = GameState::new(Settings::from_difficulty(Difficulty::Hard));
        assert_eq!(state.autonomous.speeds.cruise, 26.0);
        assert_eq!(state.controlled.speeds.cruise, CRUISE_SPEED);
    }

    #[test]
    fn test_actor_colors_follow_settings() {
        let state = GameState::new(Settings::default());
        assert_eq!(state.controlled.color, ColorTag(CONTROLLED_COLOR));
        assert_eq!(state.autonomous.color, ColorTag(AUTONOMOUS_COLOR));

        let state = GameState::new(Settings {
            controlled_color: 0x39FF14,
            ..Settings::from_difficulty(Difficulty::Hard)
        });
        assert_eq!(state.controlled.color, ColorTag(0x39FF14));
        assert_eq!(state.autonomous.color, ColorTag(PURSUIT_COLOR));
    }

    #[test]
    fn test_obstacles_skip_dead_bodies() {
        let mut state = GameState::new(Settings::default());
        state.start();
        state.refresh_obstacles();
        // One segment and one body each
        assert_eq!(state.obstacles().len(), 4);

        state.autonomous.die();
        state.refresh_obstacles();
        assert_eq!(state.obstacles().len(), 3);
        assert!(
            !state
                .obstacles()
                .iter()
                .any(|o| o.owner == ActorId::Autonomous && o.kind == ObstacleKind::Body)
        );
    }

    #[test]
    fn test_finish_once() {
        let mut state = GameState::new(Settings::default());
        state.start();
        state.score = 42.7;
        state.finish(true);
        state.finish(false);
        let summary = state.outcome().unwrap();
        assert!(summary.victory);
        assert_eq!(summary.score, 1042);
    }

    #[test]
    fn test_live_target() {
        let mut state = GameState::new(Settings::default());
        state.start();
        assert_eq!(
            state.live_target_for(ActorId::Autonomous),
            Some(Vec2::new(-10.0, 80.0))
        );
        state.controlled.die();
        assert_eq!(state.live_target_for(ActorId::Autonomous), None);
    }
}
