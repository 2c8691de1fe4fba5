//! Directional input mapping

use super::state::{Direction, Velocity};

/// Velocity for `intent`, or `current` when the intent would reverse it.
pub fn apply_intent(current: Velocity, intent: Direction, unit: i32) -> Velocity {
    let requested = Velocity::from_direction(intent, unit);
    if requested.is_reverse_of(current) {
        current
    } else {
        requested
    }
}

/// Velocity shared between the input side and the tick side.
///
/// Intents are checked against the pending velocity and against `heading`,
/// the velocity the last tick moved with, so two quick turns between ticks
/// cannot fold the head back onto the neck. The most recent accepted intent
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steering {
    heading: Velocity,
    pending: Velocity,
}

impl Steering {
    pub fn new(initial: Velocity) -> Self {
        Self {
            heading: initial,
            pending: initial,
        }
    }

    /// Record an intent. Returns true if it was accepted.
    pub fn apply(&mut self, intent: Direction, unit: i32) -> bool {
        let requested = Velocity::from_direction(intent, unit);
        if requested.is_reverse_of(self.pending) || requested.is_reverse_of(self.heading) {
            return false;
        }
        self.pending = requested;
        true
    }

    /// Velocity the next tick will use
    pub fn pending(&self) -> Velocity {
        self.pending
    }

    /// Velocity the last tick used
    pub fn heading(&self) -> Velocity {
        self.heading
    }

    /// Lock in the pending velocity for this tick and return it.
    pub fn commit(&mut self) -> Velocity {
        self.heading = self.pending;
        self.heading
    }
}
