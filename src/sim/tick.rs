//! Fixed timestep simulation tick
//!
//! Advances a match by one frame in a fixed order: input, agent decisions,
//! turn resolution, motion, collisions, then trails and death effects. Every
//! stage visits the controlled actor before the autonomous one.

use glam::{Vec2, Vec3};
use rand::RngCore;

use super::actor::{Actor, ActorId, Controls};
use super::policy::{Autopilot, DecisionPolicy, PolicyInput};
use super::sensor::{Obstacle, SensorArray};
use super::state::{GamePhase, GameState, SimEvent};
use super::turn::{TurnAction, TurnResolution};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left turn pressed this frame
    pub turn_left_pressed: bool,
    /// Right turn pressed this frame
    pub turn_right_pressed: bool,
    /// Boost held
    pub boost: bool,
    /// Brake held
    pub brake: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the demo autopilot drives the controlled actor
    pub idle_mode: bool,
}

impl TickInput {
    /// Fold a new frame's input in: presses accumulate until a tick consumes
    /// them, held state is replaced
    pub fn merge(&mut self, frame: TickInput) {
        self.turn_left_pressed |= frame.turn_left_pressed;
        self.turn_right_pressed |= frame.turn_right_pressed;
        self.pause |= frame.pause;
        self.boost = frame.boost;
        self.brake = frame.brake;
        self.idle_mode = frame.idle_mode;
    }

    pub fn clear_presses(&mut self) {
        self.turn_left_pressed = false;
        self.turn_right_pressed = false;
        self.pause = false;
    }
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.set_phase(GamePhase::Paused);
                return;
            }
            GamePhase::Paused => state.set_phase(GamePhase::Playing),
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Idle | GamePhase::Paused => return,
        GamePhase::GameOver => {
            state.particles.advance(dt);
            return;
        }
        GamePhase::Countdown => {
            state.countdown -= dt;
            if state.countdown <= 0.0 {
                state.countdown = 0.0;
                state.set_phase(GamePhase::Playing);
            }
            state.particles.advance(dt);
            return;
        }
        GamePhase::Playing => {}
    }

    state.clock.advance(dt);
    let now = state.clock.now();
    state.refresh_obstacles();

    // 1. Controlled actor input
    if input.idle_mode {
        let target = state.live_target_for(ActorId::Controlled);
        drive(
            &mut state.controlled,
            &mut state.demo_pilot,
            target,
            &state.obstacles,
            &mut state.rng,
            now,
            dt,
        );
    } else if state.controlled.is_alive() {
        if input.turn_left_pressed {
            state.controlled.request_turn(TurnAction::Left, now);
        }
        if input.turn_right_pressed {
            state.controlled.request_turn(TurnAction::Right, now);
        }
        state.controlled.controls = Controls {
            boost: input.boost,
            brake: input.brake,
        };
    }

    // 2. Autonomous decision from this frame's readings
    let target = state.live_target_for(ActorId::Autonomous);
    drive(
        &mut state.autonomous,
        &mut state.opponent_pilot,
        target,
        &state.obstacles,
        &mut state.rng,
        now,
        dt,
    );

    // 3. Buffered turns
    for id in [ActorId::Controlled, ActorId::Autonomous] {
        let actor = state.actor_mut(id);
        match actor.resolve_turn(now) {
            TurnResolution::Executed(_) => {
                let heading = actor.heading;
                log::debug!("{id:?} turned {heading:?} at {:?}", actor.pos);
                state.events.push(SimEvent::Turned { actor: id, heading });
            }
            TurnResolution::Expired => log::trace!("{id:?} turn intent expired"),
            TurnResolution::Idle | TurnResolution::Deferred => {}
        }
    }

    // 4. Speed and motion
    for actor in [&mut state.controlled, &mut state.autonomous] {
        actor.update_speed(dt);
        actor.integrate(dt);
    }

    // 5. Collisions
    let mut causes = [None, None];
    for (slot, actor) in causes.iter_mut().zip([&mut state.controlled, &mut state.autonomous]) {
        *slot = actor.check_collision(&mut state.grid);
    }

    // 6. Trails and death effects
    state.particles.advance(dt);
    for (cause, id) in causes.into_iter().zip([ActorId::Controlled, ActorId::Autonomous]) {
        let actor = state.actor_mut(id);
        actor.update_trail();
        if !actor.take_death() {
            continue;
        }
        let Some(cause) = cause else { continue };
        let (position, color) = (actor.pos, actor.color);
        log::info!("{id:?} destroyed ({cause:?}) at {position:?}");
        state.events.push(SimEvent::ActorDied {
            actor: id,
            position,
            color,
            cause,
        });
        if state.settings.particles {
            state.particles.spawn(Vec3::new(position.x, 0.0, position.y), color);
        }
    }

    if state.controlled.is_alive() {
        state.max_speed = state.max_speed.max(state.controlled.speed());
    }

    if !state.controlled.is_alive() {
        state.finish(false);
    } else if !state.autonomous.is_alive() {
        state.finish(true);
    } else {
        state.score += SCORE_PER_SEC * dt;
        state.game_time += dt;
    }
}

/// Let an autopilot steer `actor` if a decision is due
fn drive(
    actor: &mut Actor,
    pilot: &mut Autopilot,
    target: Option<Vec2>,
    obstacles: &[Obstacle],
    rng: &mut dyn RngCore,
    now: f64,
    dt: f32,
) {
    if !actor.is_alive() || !pilot.due(dt) {
        return;
    }

    let sensors = SensorArray::new(pilot.policy.sensing_range());
    let input = PolicyInput {
        readings: sensors.scan(actor.pos, actor.heading, actor.id, obstacles),
        position: actor.pos,
        heading: actor.heading,
        target,
    };
    let decision = pilot.policy.decide(&input, rng);
    log::trace!("{} decision for {:?}: {:?}", pilot.policy.kind(), actor.id, decision);
    if let Some(turn) = decision.turn {
        actor.request_turn(turn, now);
    }
    actor.controls = Controls {
        boost: decision.boost,
        brake: decision.brake,
    };
}

/// Run the fixed-step loop over a variable frame time
///
/// Returns the leftover time to carry into the next frame. At most
/// `MAX_SUBSTEPS` ticks run; any backlog beyond that is dropped. Presses in
/// `input` go to the first substep and are cleared only once a tick has run,
/// so a frame shorter than `SIM_DT` carries them to the next frame.
pub fn run_frame(
    state: &mut GameState,
    input: &mut TickInput,
    frame_dt: f32,
    mut accumulator: f32,
) -> f32 {
    accumulator += frame_dt;
    let mut steps = 0;
    while accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
        tick(state, input, SIM_DT);
        accumulator -= SIM_DT;
        steps += 1;

        // Clear one-shot inputs after processing
        input.clear_presses();
    }
    if steps == MAX_SUBSTEPS && accumulator >= SIM_DT {
        log::debug!("Dropping {:.3}s of simulation backlog", accumulator);
        accumulator = 0.0;
    }
    accumulator
}
