//! Game loop driver
//!
//! Owns the `GameState`, a fixed-delay `Ticker`, and the two collaborators
//! that see the game from outside: a `Renderer` and a `HighScoreStore`.
//! Time is passed in by the caller, so the driver itself never sleeps.
//!
//! Phases:
//! - `Idle`: built, nothing scheduled
//! - `Running`: one tick scheduled at a time, re-armed after each tick
//! - `GameOver`: nothing scheduled until `reset`

use std::time::{Duration, Instant};

use crate::error::{ConfigError, StoreError};
use crate::settings::Settings;
use crate::sim::{Cell, Direction, EndReason, GameState, Grid, Snake, TickOutcome, Velocity, tick};

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

/// Handle to one scheduled tick. Only valid until the ticker is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

/// Fixed-delay scheduler with a cancellation generation.
///
/// At most one tick is pending. `cancel` bumps the generation so a token
/// handed out earlier is recognised as stale.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    deadline: Option<Instant>,
    generation: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
            generation: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule the next tick one period after `now`
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Drop the pending tick and invalidate outstanding tokens
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.generation += 1;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Take the pending tick if its deadline has passed
    pub fn due(&mut self, now: Instant) -> Option<TickToken> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(TickToken {
                    generation: self.generation,
                })
            }
            _ => None,
        }
    }

    pub fn is_current(&self, token: TickToken) -> bool {
        token.generation == self.generation
    }
}

/// Snapshot handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub snake: &'a Snake,
    pub food: Cell,
    pub velocity: Velocity,
    pub score: u64,
    pub high_score: u64,
    pub grid: Grid,
}

impl<'a> Frame<'a> {
    pub fn of(state: &'a GameState, high_score: u64) -> Self {
        Self {
            snake: &state.snake,
            food: state.food,
            // The head faces where it last moved, not the queued turn
            velocity: state.steering.heading(),
            score: state.score,
            high_score,
            grid: state.grid,
        }
    }
}

/// Draws the game. Nothing it does feeds back into the simulation.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);

    fn game_over(&mut self, frame: &Frame<'_>, reason: EndReason);
}

/// Where the best score lives between sessions
pub trait HighScoreStore {
    /// Current best, 0 if none was ever stored
    fn high_score(&self) -> u64;

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Runs games: start, ticks, game over, reset.
pub struct Driver<R, S> {
    settings: Settings,
    base_seed: u64,
    runs: u64,
    state: GameState,
    phase: Phase,
    ticker: Ticker,
    renderer: R,
    store: S,
}

impl<R: Renderer, S: HighScoreStore> Driver<R, S> {
    /// Build an idle driver. Fails on invalid settings.
    pub fn new(settings: Settings, seed: u64, renderer: R, store: S) -> Result<Self, ConfigError> {
        let state = GameState::new(&settings, seed)?;
        let ticker = Ticker::new(settings.tick_interval());
        Ok(Self {
            settings,
            base_seed: seed,
            runs: 0,
            state,
            phase: Phase::Idle,
            ticker,
            renderer,
            store,
        })
    }

    /// Begin the first run. Ignored unless idle.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        self.begin_run(now);
    }

    /// Abandon the current run, if any, and start a fresh one.
    ///
    /// The pending tick is cancelled before the state is rebuilt.
    pub fn reset(&mut self, now: Instant) -> Result<(), ConfigError> {
        self.ticker.cancel();
        self.phase = Phase::Idle;

        self.runs += 1;
        let seed = self.base_seed.wrapping_add(self.runs);
        self.state = GameState::new(&self.settings, seed)?;
        self.begin_run(now);
        Ok(())
    }

    /// Feed a directional intent. Returns true if it changed the steering.
    pub fn handle_intent(&mut self, intent: Direction) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.state.steering.apply(intent, self.state.grid.unit)
    }

    /// Run the tick `token` refers to.
    ///
    /// Returns `None` without touching the state when the token is stale
    /// (cancelled by a reset) or no run is in progress.
    pub fn fire(&mut self, token: TickToken, now: Instant) -> Option<TickOutcome> {
        if self.phase != Phase::Running || !self.ticker.is_current(token) {
            log::debug!("Dropping stale tick");
            return None;
        }

        let outcome = tick(&mut self.state);
        match outcome {
            TickOutcome::Continue => {
                let frame = Frame::of(&self.state, self.store.high_score());
                self.renderer.render(&frame);
                self.ticker.arm(now);
            }
            TickOutcome::Ended(reason) => self.finish(reason),
        }
        Some(outcome)
    }

    /// Fire the pending tick if it is due at `now`
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        let token = self.ticker.due(now)?;
        self.fire(token, now)
    }

    /// When the next tick is due, if one is scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.deadline()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u64 {
        self.store.high_score()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn begin_run(&mut self, now: Instant) {
        self.phase = Phase::Running;
        log::info!("Run started (seed {})", self.state.seed);
        let frame = Frame::of(&self.state, self.store.high_score());
        self.renderer.render(&frame);
        self.ticker.arm(now);
    }

    fn finish(&mut self, reason: EndReason) {
        self.ticker.cancel();
        self.phase = Phase::GameOver;

        let score = self.state.score;
        let previous = self.store.high_score();
        if score > previous {
            match self.store.set_high_score(score) {
                Ok(()) => log::info!("New high score {} (was {})", score, previous),
                Err(e) => log::warn!("Failed to store high score {}: {}", score, e),
            }
        }

        let frame = Frame::of(&self.state, self.store.high_score());
        self.renderer.game_over(&frame, reason);
    }
}
