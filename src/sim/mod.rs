//! Simulation module
//!
//! All gameplay logic lives here. It has no rendering, timing or storage
//! dependencies:
//! - One discrete step per tick
//! - Seeded RNG only (food placement)
//! - State owned by `GameState`, no globals

pub mod collision;
pub mod food;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{boundary_violation, self_collision};
pub use food::{BoardFull, place_food};
pub use input::{Steering, apply_intent};
pub use state::{Cell, Direction, EndReason, GameState, Grid, RunState, Snake, Velocity};
pub use tick::{TickOutcome, TickResult, advance, tick};
