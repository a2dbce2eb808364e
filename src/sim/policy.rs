//! Decision engine for the autonomous actor
//!
//! Policies read a [`SensorReadings`] set (plus an optional pursuit target)
//! and produce a [`Decision`]: an optional turn intent and the brake/boost
//! controls. The decision is written into the same turn buffer and controls
//! the controlled actor uses, so motion and collision code never knows which
//! policy is driving.

use std::cmp::Ordering;

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::actor::Heading;
use super::sensor::SensorReadings;
use super::turn::TurnAction;

/// What a policy sees each decision
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput {
    pub readings: SensorReadings,
    pub position: Vec2,
    pub heading: Heading,
    /// Live opponent position, if any
    pub target: Option<Vec2>,
}

/// What a policy wants this decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub turn: Option<TurnAction>,
    pub brake: bool,
    pub boost: bool,
}

/// When a policy gets to think
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThinkCadence {
    /// Seconds of play before the first decision
    pub start_delay: f32,
    /// Seconds between decisions (0 = every frame)
    pub interval: f32,
}

/// Shared interface implemented by all agent policies
pub trait DecisionPolicy {
    /// Policy identifier, for logs
    fn kind(&self) -> &'static str;

    /// Sensor cap this policy wants its readings computed with
    fn sensing_range(&self) -> f32;

    fn cadence(&self) -> ThinkCadence;

    /// Choose an action from the current readings
    fn decide(&self, input: &PolicyInput, rng: &mut dyn RngCore) -> Decision;
}

/// True when `pos` is already past `limit` in the direction `dir` points
fn beyond_limit(pos: Vec2, dir: Vec2, limit: f32) -> bool {
    (dir.x > 0.5 && pos.x > limit)
        || (dir.x < -0.5 && pos.x < -limit)
        || (dir.y > 0.5 && pos.y > limit)
        || (dir.y < -0.5 && pos.y < -limit)
}

/// Tuning for [`SurvivalPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    pub sensing_range: f32,
    /// Front reading that triggers urgent mode and braking
    pub panic_distance: f32,
    /// Lateral reading below which a turn to that side is disallowed
    pub turn_distance: f32,
    /// Score assigned to a side closer than `turn_distance`
    pub blocked_score: f32,
    pub diagonal_threshold: f32,
    pub diagonal_penalty: f32,
    /// Distance from center past which the edge counts as close
    pub safe_limit: f32,
    pub edge_penalty: f32,
    /// Per-decision probability of an opportunistic turn
    pub wander_chance: f64,
    pub wander_min_score: f32,
    pub start_delay: f32,
    pub reaction_time: f32,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            sensing_range: 200.0,
            panic_distance: 25.0,
            turn_distance: 10.0,
            blocked_score: -9999.0,
            diagonal_threshold: 15.0,
            diagonal_penalty: 500.0,
            safe_limit: 85.0,
            edge_penalty: 1000.0,
            wander_chance: 0.02,
            wander_min_score: 50.0,
            start_delay: 1.0,
            reaction_time: 0.05,
        }
    }
}

/// Survival-first agent: keeps lateral escape routes open, turns when boxed in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivalPolicy {
    pub config: SurvivalConfig,
}

impl SurvivalPolicy {
    pub fn new(config: SurvivalConfig) -> Self {
        Self { config }
    }

    /// Left and right turn scores after all penalties
    pub fn side_scores(&self, input: &PolicyInput) -> (f32, f32) {
        let c = &self.config;
        let r = &input.readings;
        let mut left = r.left;
        let mut right = r.right;

        if r.diag_left < c.diagonal_threshold {
            left -= c.diagonal_penalty;
        }
        if r.diag_right < c.diagonal_threshold {
            right -= c.diagonal_penalty;
        }

        if r.left < c.turn_distance {
            left = c.blocked_score;
        }
        if r.right < c.turn_distance {
            right = c.blocked_score;
        }

        let left_dir = input.heading.turned(TurnAction::Left).vector();
        let right_dir = input.heading.turned(TurnAction::Right).vector();
        if beyond_limit(input.position, left_dir, c.safe_limit) {
            left -= c.edge_penalty;
        }
        if beyond_limit(input.position, right_dir, c.safe_limit) {
            right -= c.edge_penalty;
        }

        (left, right)
    }
}

impl DecisionPolicy for SurvivalPolicy {
    fn kind(&self) -> &'static str {
        "survival"
    }

    fn sensing_range(&self) -> f32 {
        self.config.sensing_range
    }

    fn cadence(&self) -> ThinkCadence {
        ThinkCadence {
            start_delay: self.config.start_delay,
            interval: self.config.reaction_time,
        }
    }

    fn decide(&self, input: &PolicyInput, rng: &mut dyn RngCore) -> Decision {
        let c = &self.config;
        let (left, right) = self.side_scores(input);

        let urgent = input.readings.front < c.panic_distance
            || beyond_limit(input.position, input.heading.vector(), c.safe_limit);

        if urgent {
            // Both sides closed: hold course and brake
            let turn = if left > right && left > 0.0 {
                Some(TurnAction::Left)
            } else if right > left && right > 0.0 {
                Some(TurnAction::Right)
            } else {
                None
            };
            return Decision {
                turn,
                brake: true,
                boost: false,
            };
        }

        let mut turn = None;
        if rng.random_bool(c.wander_chance.clamp(0.0, 1.0)) {
            if left > c.wander_min_score && left > right {
                turn = Some(TurnAction::Left);
            } else if right > c.wander_min_score && right > left {
                turn = Some(TurnAction::Right);
            }
        }

        Decision {
            turn,
            brake: false,
            boost: false,
        }
    }
}

/// Tuning for [`PursuitPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Sensor cap
    pub view_distance: f32,
    /// Primary reading below which a direction is nearly fatal
    pub imminent_distance: f32,
    pub wall_penalty: f32,
    /// Primary reading below which the graded penalty applies
    pub near_distance: f32,
    pub near_penalty_per_unit: f32,
    pub primary_weight: f32,
    pub diagonal_weight: f32,
    pub attack_bonus: f32,
    /// Minimum dot product with the target direction to earn the attack bonus
    pub attack_alignment: f32,
    /// Front reading below which the agent brakes regardless of choice
    pub critical_distance: f32,
    pub boost_min_front: f32,
    pub boost_min_score: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            view_distance: 80.0,
            imminent_distance: 5.0,
            wall_penalty: 1000.0,
            near_distance: 20.0,
            near_penalty_per_unit: 50.0,
            primary_weight: 2.0,
            diagonal_weight: 1.0,
            attack_bonus: 200.0,
            attack_alignment: 0.5,
            critical_distance: 15.0,
            boost_min_front: 60.0,
            boost_min_score: 200.0,
        }
    }
}

/// Candidate actions, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Forward,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Forward, Move::Left, Move::Right];

    fn heading_after(self, heading: Heading) -> Heading {
        match self {
            Move::Forward => heading,
            Move::Left => heading.turned(TurnAction::Left),
            Move::Right => heading.turned(TurnAction::Right),
        }
    }
}

/// Scored candidate, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveScore {
    pub action: Move,
    pub score: f32,
}

/// Scoring agent that weighs open space against cutting off a live target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PursuitPolicy {
    pub config: PursuitConfig,
}

impl PursuitPolicy {
    pub fn new(config: PursuitConfig) -> Self {
        Self { config }
    }

    /// Score one candidate action
    pub fn evaluate(&self, action: Move, input: &PolicyInput) -> f32 {
        let c = &self.config;
        let r = &input.readings;
        let (primary, diagonal) = match action {
            Move::Forward => (r.front, (r.diag_left + r.diag_right) / 2.0),
            Move::Left => (r.left, r.diag_left),
            Move::Right => (r.right, r.diag_right),
        };

        let mut score = 0.0;

        // Survival
        if primary < c.imminent_distance {
            score -= c.wall_penalty;
        } else if primary < c.near_distance {
            score -= (c.near_distance - primary) * c.near_penalty_per_unit;
        }

        // Open space
        score += primary * c.primary_weight;
        score += diagonal * c.diagonal_weight;

        // Attack
        if let Some(target) = input.target {
            let to_target = (target - input.position).normalize_or_zero();
            let alignment = to_target.dot(action.heading_after(input.heading).vector());
            if alignment > c.attack_alignment {
                score += c.attack_bonus * alignment;
            }
        }

        score
    }

    /// All candidates ranked best first; ties keep forward, left, right order
    pub fn rank(&self, input: &PolicyInput) -> [MoveScore; 3] {
        let mut ranked = Move::ALL.map(|action| MoveScore {
            action,
            score: self.evaluate(action, input),
        });
        // Stable sort keeps enumeration order on ties
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked
    }
}

impl DecisionPolicy for PursuitPolicy {
    fn kind(&self) -> &'static str {
        "pursuit"
    }

    fn sensing_range(&self) -> f32 {
        self.config.view_distance
    }

    fn cadence(&self) -> ThinkCadence {
        ThinkCadence {
            start_delay: 0.0,
            interval: 0.0,
        }
    }

    fn decide(&self, input: &PolicyInput, _rng: &mut dyn RngCore) -> Decision {
        let c = &self.config;
        let ranked = self.rank(input);
        let best = ranked[0].action;

        let turn = match best {
            Move::Forward => None,
            Move::Left => Some(TurnAction::Left),
            Move::Right => Some(TurnAction::Right),
        };

        if input.readings.front < c.critical_distance {
            return Decision {
                turn,
                brake: true,
                boost: false,
            };
        }

        let forward_score = ranked
            .iter()
            .find(|s| s.action == Move::Forward)
            .map_or(f32::NEG_INFINITY, |s| s.score);
        let boost = best == Move::Forward
            && input.readings.front > c.boost_min_front
            && forward_score > c.boost_min_score;

        Decision {
            turn,
            brake: false,
            boost,
        }
    }
}

/// Policy selected at match setup
#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    Survival(SurvivalPolicy),
    Pursuit(PursuitPolicy),
}

impl DecisionPolicy for Policy {
    fn kind(&self) -> &'static str {
        match self {
            Policy::Survival(p) => p.kind(),
            Policy::Pursuit(p) => p.kind(),
        }
    }

    fn sensing_range(&self) -> f32 {
        match self {
            Policy::Survival(p) => p.sensing_range(),
            Policy::Pursuit(p) => p.sensing_range(),
        }
    }

    fn cadence(&self) -> ThinkCadence {
        match self {
            Policy::Survival(p) => p.cadence(),
            Policy::Pursuit(p) => p.cadence(),
        }
    }

    fn decide(&self, input: &PolicyInput, rng: &mut dyn RngCore) -> Decision {
        match self {
            Policy::Survival(p) => p.decide(input, rng),
            Policy::Pursuit(p) => p.decide(input, rng),
        }
    }
}

/// Runs a policy on its cadence
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub policy: Policy,
    start_delay: f32,
    timer: f32,
}

impl Autopilot {
    pub fn new(policy: Policy) -> Self {
        let start_delay = policy.cadence().start_delay;
        Self {
            policy,
            start_delay,
            timer: 0.0,
        }
    }

    /// Restart the cadence (new match)
    pub fn reset(&mut self) {
        self.start_delay = self.policy.cadence().start_delay;
        self.timer = 0.0;
    }

    /// Advance the cadence by `dt`; true when a decision is due this frame
    pub fn due(&mut self, dt: f32) -> bool {
        if self.start_delay > 0.0 {
            self.start_delay -= dt;
            return false;
        }

        let interval = self.policy.cadence().interval;
        if interval <= 0.0 {
            return true;
        }

        self.timer += dt;
        if self.timer > interval {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}
