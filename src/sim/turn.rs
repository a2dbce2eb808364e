//! Turn intent buffering
//!
//! Input arrives whenever the player presses a key; a turn may only happen
//! near a grid line. The buffer keeps the latest intent alive for a short
//! window so the actor can execute it on the first frame the grid allows.
//!
//! Timestamps come from [`SimClock`], which only advances while the match is
//! running, so a pause never expires a pending intent.

use serde::{Deserialize, Serialize};

use crate::consts::TURN_BUFFER_WINDOW;

/// A requested 90 degree turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    Left,
    Right,
}

/// Simulation time in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt);
    }

    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

/// An intent waiting for a grid line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub action: TurnAction,
    pub requested_at: f64,
}

/// Buffer state, for telemetry and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Empty,
    Pending,
}

/// What happened to the buffer this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResolution {
    /// Nothing was pending
    Idle,
    /// The intent outlived the window and was dropped
    Expired,
    /// The turn happened and the intent was consumed
    Executed(TurnAction),
    /// Not aligned with the grid yet; kept for the next frame
    Deferred,
}

/// Single-slot pending turn holder
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnBuffer {
    pending: Option<PendingTurn>,
}

impl TurnBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an intent. Overwrites anything not yet consumed.
    pub fn request(&mut self, action: TurnAction, now: f64) {
        self.pending = Some(PendingTurn {
            action,
            requested_at: now,
        });
    }

    pub fn state(&self) -> BufferState {
        if self.pending.is_some() {
            BufferState::Pending
        } else {
            BufferState::Empty
        }
    }

    pub fn pending(&self) -> Option<PendingTurn> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Expire a stale intent, then hand a live one to `try_turn`
    ///
    /// `try_turn` returns true when the turn was executed, which consumes the
    /// intent. A false return leaves it pending for the next frame.
    pub fn resolve(
        &mut self,
        now: f64,
        try_turn: impl FnOnce(TurnAction) -> bool,
    ) -> TurnResolution {
        let Some(pending) = self.pending else {
            return TurnResolution::Idle;
        };

        if now - pending.requested_at > TURN_BUFFER_WINDOW {
            self.pending = None;
            return TurnResolution::Expired;
        }

        if try_turn(pending.action) {
            self.pending = None;
            TurnResolution::Executed(pending.action)
        } else {
            TurnResolution::Deferred
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_latest_intent_wins() {
        let mut buffer = TurnBuffer::new();
        buffer.request(TurnAction::Left, 1.0);
        buffer.request(TurnAction::Right, 1.01);

        let pending = buffer.pending().unwrap();
        assert_eq!(pending.action, TurnAction::Right);
        assert_eq!(pending.requested_at, 1.01);
    }

    #[test]
    fn test_deferred_then_executed() {
        let mut buffer = TurnBuffer::new();
        buffer.request(TurnAction::Left, 0.0);

        assert_eq!(buffer.resolve(0.01, |_| false), TurnResolution::Deferred);
        assert_eq!(buffer.state(), BufferState::Pending);

        assert_eq!(buffer.resolve(0.02, |_| true), TurnResolution::Executed(TurnAction::Left));
        assert_eq!(buffer.state(), BufferState::Empty);
        assert_eq!(buffer.resolve(0.03, |_| true), TurnResolution::Idle);
    }

    #[test]
    fn test_expired_intent_is_never_tried() {
        let mut buffer = TurnBuffer::new();
        buffer.request(TurnAction::Right, 2.0);

        let resolution = buffer.resolve(2.2, |_| panic!("stale intent must not execute"));
        assert_eq!(resolution, TurnResolution::Expired);
        assert_eq!(buffer.state(), BufferState::Empty);
    }

    #[test]
    fn test_clock_frozen_while_not_advanced() {
        let mut clock = SimClock::new();
        let mut buffer = TurnBuffer::new();
        buffer.request(TurnAction::Left, clock.now());

        // A long pause does not move simulation time
        clock.advance(0.1);
        assert_eq!(buffer.resolve(clock.now(), |_| false), TurnResolution::Deferred);
    }

    proptest! {
        #[test]
        fn prop_never_executes_after_window(
            stamp in 0.0f64..100.0,
            delays in prop::collection::vec(0.0f64..0.05, 1..20),
        ) {
            let mut buffer = TurnBuffer::new();
            buffer.request(TurnAction::Left, stamp);
            let mut now = stamp;
            for delay in delays {
                now += delay;
                let late = now - stamp > TURN_BUFFER_WINDOW;
                let resolution = buffer.resolve(now, |_| false);
                if late {
                    prop_assert_eq!(resolution, TurnResolution::Expired);
                    prop_assert_eq!(buffer.state(), BufferState::Empty);
                    break;
                }
                prop_assert_eq!(resolution, TurnResolution::Deferred);
            }
        }
    }
}
