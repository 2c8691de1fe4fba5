//! Grid Snake - a fixed-tick snake game on a bounded grid
//!
//! Core modules:
//! - `sim`: Simulation (snake movement, collisions, food placement, game state)
//! - `driver`: Game loop driver, tick scheduling and collaborator traits
//! - `settings`: Static game configuration
//! - `highscores`: Persistent best score
//! - `term`: Terminal renderer and key mapping

pub mod driver;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod term;

pub use driver::{Driver, Frame, HighScoreStore, Phase, Renderer, TickToken, Ticker};
pub use error::{ConfigError, StoreError};
pub use highscores::{HighScores, MemoryStore};
pub use settings::Settings;
pub use sim::{Direction, EndReason, GameState, TickOutcome};

/// Game configuration defaults
pub mod consts {
    /// Edge length of one grid cell / snake segment
    pub const UNIT_SIZE: i32 = 25;

    /// Board dimensions (multiples of the unit)
    pub const GRID_WIDTH: i32 = 500;
    pub const GRID_HEIGHT: i32 = 500;

    /// Fixed delay between two ticks
    pub const TICK_INTERVAL_MS: u64 = 100;

    /// Body length at game start
    pub const INITIAL_SNAKE_LENGTH: usize = 5;

    /// Random samples tried before falling back to a scan of the free cells
    pub const FOOD_SAMPLE_ATTEMPTS: usize = 64;
}
