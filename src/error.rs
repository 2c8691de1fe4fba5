//! Error types
//!
//! Collisions and a full board are game outcomes, not errors; they are
//! reported through `sim::TickOutcome`. The types here cover bad
//! configuration and high score storage failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable configuration. Raised at construction time only.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{field} ({value}) is not a multiple of the unit size ({unit})")]
    NotUnitAligned {
        field: &'static str,
        value: i32,
        unit: i32,
    },

    #[error("initial snake length {length} does not fit in a row of {columns} cells")]
    SnakeTooLong { length: usize, columns: i32 },

    #[error("a {cells}-cell board has no room for food next to a {length}-cell snake")]
    NoRoomForFood { length: usize, cells: usize },

    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reading or writing the persisted high score.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode high scores")]
    Encode(#[from] serde_json::Error),
}
