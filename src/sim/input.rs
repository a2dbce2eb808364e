//! Raw input to tick input
//!
//! Device bindings live outside the core. The caller reports which logical
//! actions are held each frame; the latch turns that into the edge-triggered
//! turn and pause signals the simulation consumes.

use serde::{Deserialize, Serialize};

use super::tick::TickInput;

/// Logical actions held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub boost: bool,
    pub brake: bool,
    pub pause: bool,
}

/// Remembers last frame's held state to detect presses
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLatch {
    previous: ActionState,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build this frame's tick input from the held actions
    pub fn latch(&mut self, held: ActionState) -> TickInput {
        let prev = self.previous;
        self.previous = held;
        TickInput {
            turn_left_pressed: held.turn_left && !prev.turn_left,
            turn_right_pressed: held.turn_right && !prev.turn_right,
            boost: held.boost,
            brake: held.brake,
            pause: held.pause && !prev.pause,
            idle_mode: false,
        }
    }

    /// Forget held state (focus loss)
    pub fn reset(&mut self) {
        self.previous = ActionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_is_edge_triggered() {
        let mut latch = InputLatch::new();
        let held = ActionState {
            turn_left: true,
            ..Default::default()
        };
        assert!(latch.latch(held).turn_left_pressed);
        // Still held: no new press
        assert!(!latch.latch(held).turn_left_pressed);
        latch.latch(ActionState::default());
        assert!(latch.latch(held).turn_left_pressed);
    }

    #[test]
    fn test_boost_and_brake_are_level() {
        let mut latch = InputLatch::new();
        let held = ActionState {
            boost: true,
            brake: true,
            ..Default::default()
        };
        latch.latch(held);
        let input = latch.latch(held);
        assert!(input.boost && input.brake);
    }

    #[test]
    fn test_reset_rearms_presses() {
        let mut latch = InputLatch::new();
        let held = ActionState {
            pause: true,
            ..Default::default()
        };
        assert!(latch.latch(held).pause);
        latch.reset();
        assert!(latch.latch(held).pause);
    }
}
