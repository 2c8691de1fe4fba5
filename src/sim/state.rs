//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything that changes during a run.

use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::food::place_food;
use super::input::Steering;
use crate::error::ConfigError;
use crate::settings::Settings;

/// A grid cell, addressed by the pixel coordinates of its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell one velocity step away
    pub fn offset(self, velocity: Velocity) -> Self {
        Self::new(self.x + velocity.dx, self.y + velocity.dy)
    }
}

/// Board bounds: `[0, width) x [0, height)`, cut into `unit`-sized cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub unit: i32,
}

impl Grid {
    pub const fn new(width: i32, height: i32, unit: i32) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn columns(&self) -> i32 {
        self.width / self.unit
    }

    pub fn rows(&self) -> i32 {
        self.height / self.unit
    }

    pub fn cell_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Cell at a column/row index
    pub fn cell_at(&self, column: i32, row: i32) -> Cell {
        Cell::new(column * self.unit, row * self.unit)
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.columns()).map(move |col| self.cell_at(col, row)))
    }
}

/// A directional intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Per-tick head displacement. Exactly one axis is nonzero, with magnitude `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub fn from_direction(direction: Direction, unit: i32) -> Self {
        let (dx, dy) = match direction {
            Direction::Up => (0, -unit),
            Direction::Down => (0, unit),
            Direction::Left => (-unit, 0),
            Direction::Right => (unit, 0),
        };
        Self { dx, dy }
    }

    pub fn direction(self) -> Direction {
        if self.dx > 0 {
            Direction::Right
        } else if self.dx < 0 {
            Direction::Left
        } else if self.dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn is_reverse_of(self, other: Velocity) -> bool {
        self.dx == -other.dx && self.dy == -other.dy
    }
}

/// Snake body, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Build a snake from its cells, head first. Returns `None` for an empty body.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        (!body.is_empty()).then_some(Self { body })
    }

    /// Starting body on the top row: head at `((len-1)*unit, 0)`, tail at the origin
    pub fn horizontal(len: usize, unit: i32) -> Self {
        let len = len.max(1) as i32;
        Self {
            body: (0..len).rev().map(|i| Cell::new(i * unit, 0)).collect(),
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn occupied(&self) -> HashSet<Cell> {
        self.segments().collect()
    }

    /// True when no two segments share a cell
    pub fn has_distinct_segments(&self) -> bool {
        self.occupied().len() == self.body.len()
    }

    pub(super) fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub(super) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

/// Whether the current run is still in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Head left the board
    Boundary,
    /// Head ran into the body
    SelfCollision,
    /// The snake fills every cell; no food can be placed
    BoardFull,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub steering: Steering,
    pub food: Cell,
    pub score: u64,
    pub run_state: RunState,
    pub end_reason: Option<EndReason>,
    /// Ticks advanced this run
    pub time_ticks: u64,
    /// Run seed for reproducible food placement
    pub seed: u64,
    pub(super) rng: Pcg32,
}

impl GameState {
    /// Create a fresh run: initial snake heading right, food placed, Running.
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let grid = settings.grid();
        let snake = Snake::horizontal(settings.initial_snake_length, grid.unit);
        let mut rng = Pcg32::seed_from_u64(seed);
        // validate() guarantees at least one free cell
        let food = place_food(&snake.occupied(), &grid, &mut rng).map_err(|_| {
            ConfigError::NoRoomForFood {
                length: snake.len(),
                cells: grid.cell_count(),
            }
        })?;

        Ok(Self {
            grid,
            snake,
            steering: Steering::new(Velocity::from_direction(Direction::Right, grid.unit)),
            food,
            score: 0,
            run_state: RunState::Running,
            end_reason: None,
            time_ticks: 0,
            seed,
            rng,
        })
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Velocity the next tick will use
    pub fn velocity(&self) -> Velocity {
        self.steering.pending()
    }
}
