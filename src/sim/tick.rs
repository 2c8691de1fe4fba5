//! Fixed-step simulation tick
//!
//! `advance` is the pure state transition for one step. `tick` applies it
//! to a `GameState` and keeps score and run state in sync.

use rand::Rng;

use super::collision::{boundary_violation, self_collision};
use super::food::place_food;
use super::state::{Cell, EndReason, GameState, Grid, RunState, Snake, Velocity};

/// How a step finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Ended(EndReason),
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    pub snake: Snake,
    pub food: Cell,
    /// Food was eaten and the tail kept
    pub grew: bool,
    pub outcome: TickOutcome,
}

impl TickResult {
    pub fn terminal(&self) -> bool {
        matches!(self.outcome, TickOutcome::Ended(_))
    }
}

/// Advance the snake one step.
///
/// On a collision the snake and food come back unchanged. On growth a new
/// food cell is drawn from `rng`; if none is free the result is the grown
/// snake with `TickOutcome::Ended(EndReason::BoardFull)`.
pub fn advance<R: Rng + ?Sized>(
    snake: &Snake,
    velocity: Velocity,
    food: Cell,
    grid: &Grid,
    rng: &mut R,
) -> TickResult {
    let new_head = snake.head().offset(velocity);
    let ended = |reason| TickResult {
        snake: snake.clone(),
        food,
        grew: false,
        outcome: TickOutcome::Ended(reason),
    };

    if boundary_violation(new_head, grid) {
        return ended(EndReason::Boundary);
    }

    let grows = new_head == food;
    if self_collision(new_head, snake, grows) {
        return ended(EndReason::SelfCollision);
    }

    let mut next = snake.clone();
    next.push_head(new_head);
    if !grows {
        next.drop_tail();
        return TickResult {
            snake: next,
            food,
            grew: false,
            outcome: TickOutcome::Continue,
        };
    }

    match place_food(&next.occupied(), grid, rng) {
        Ok(cell) => TickResult {
            snake: next,
            food: cell,
            grew: true,
            outcome: TickOutcome::Continue,
        },
        Err(_) => TickResult {
            snake: next,
            food,
            grew: true,
            outcome: TickOutcome::Ended(EndReason::BoardFull),
        },
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.run_state == RunState::GameOver {
        return TickOutcome::Ended(state.end_reason.unwrap_or(EndReason::Boundary));
    }

    let velocity = state.steering.commit();
    let result = advance(&state.snake, velocity, state.food, &state.grid, &mut state.rng);
    state.time_ticks += 1;

    if result.grew {
        state.score += 1;
        log::debug!("Food eaten at tick {}, score {}", state.time_ticks, state.score);
    }
    state.snake = result.snake;
    state.food = result.food;

    if let TickOutcome::Ended(reason) = result.outcome {
        state.run_state = RunState::GameOver;
        state.end_reason = Some(reason);
        log::info!("Run ended at tick {}: {:?}, score {}", state.time_ticks, reason, state.score);
    } else {
        debug_assert!(state.snake.has_distinct_segments());
    }

    result.outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Direction;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const U: i32 = 25;

    fn grid() -> Grid {
        Grid::new(500, 500, U)
    }

    fn right() -> Velocity {
        Velocity::from_direction(Direction::Right, U)
    }

    #[test]
    fn test_left_wall_ends_run() {
        let snake = Snake::from_cells([Cell::new(0, 0), Cell::new(U, 0)]).unwrap();
        let left = Velocity { dx: -U, dy: 0 };
        let mut rng = Pcg32::seed_from_u64(1);
        let result = advance(&snake, left, Cell::new(100, 100), &grid(), &mut rng);
        assert!(result.terminal());
        assert_eq!(result.outcome, TickOutcome::Ended(EndReason::Boundary));
        assert_eq!(result.snake, snake);
    }

    #[test]
    fn test_eating_grows_and_replaces_food() {
        let snake = Snake::horizontal(5, U);
        let food = Cell::new(5 * U, 0);
        let mut rng = Pcg32::seed_from_u64(1);
        let result = advance(&snake, right(), food, &grid(), &mut rng);

        assert!(!result.terminal());
        assert!(result.grew);
        assert_eq!(result.snake.head(), Cell::new(5 * U, 0));
        assert_eq!(result.snake.len(), 6);
        assert_eq!(result.snake.tail(), Cell::new(0, 0));
        assert!(!result.snake.contains(result.food));
    }

    #[test]
    fn test_plain_move_translates() {
        let snake = Snake::horizontal(5, U);
        let mut rng = Pcg32::seed_from_u64(1);
        let food = Cell::new(200, 200);
        let result = advance(&snake, right(), food, &grid(), &mut rng);

        assert!(!result.grew);
        assert_eq!(result.snake.len(), 5);
        assert_eq!(result.snake.head(), Cell::new(5 * U, 0));
        assert_eq!(result.snake.tail(), Cell::new(U, 0));
        assert_eq!(result.food, food);
    }

    #[test]
    fn test_chasing_own_tail_is_legal() {
        // 2x2 loop: head (U,0) moves left into the tail at (0,0)
        let snake = Snake::from_cells([
            Cell::new(U, 0),
            Cell::new(U, U),
            Cell::new(0, U),
            Cell::new(0, 0),
        ])
        .unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let left = Velocity { dx: -U, dy: 0 };
        let result = advance(&snake, left, Cell::new(200, 200), &grid(), &mut rng);
        assert_eq!(result.outcome, TickOutcome::Continue);
        assert_eq!(result.snake.head(), Cell::new(0, 0));
        assert!(result.snake.has_distinct_segments());
    }

    #[test]
    fn test_running_into_body_ends_run() {
        let snake = Snake::from_cells([
            Cell::new(U, 0),
            Cell::new(U, U),
            Cell::new(0, U),
            Cell::new(0, 0),
            Cell::new(0, 2 * U),
        ])
        .unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let down = Velocity { dx: 0, dy: U };
        let result = advance(&snake, down, Cell::new(200, 200), &grid(), &mut rng);
        assert_eq!(result.outcome, TickOutcome::Ended(EndReason::SelfCollision));
    }

    #[test]
    fn test_eating_last_free_cell_fills_board() {
        // 3x1 board, snake covers two cells, food on the third
        let grid = Grid::new(3 * U, U, U);
        let snake = Snake::from_cells([Cell::new(U, 0), Cell::new(0, 0)]).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let result = advance(&snake, right(), Cell::new(2 * U, 0), &grid, &mut rng);
        assert!(result.grew);
        assert_eq!(result.snake.len(), 3);
        assert_eq!(result.outcome, TickOutcome::Ended(EndReason::BoardFull));
    }

    #[test]
    fn test_tick_scores_and_ends_once() {
        let mut state = GameState::new(&Settings::default(), 5).unwrap();
        state.food = Cell::new(5 * U, 0);

        assert_eq!(tick(&mut state), TickOutcome::Continue);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 6);

        // Drive into the top wall
        state.steering.apply(Direction::Up, U);
        assert_eq!(tick(&mut state), TickOutcome::Ended(EndReason::Boundary));
        assert_eq!(state.run_state, RunState::GameOver);
        let ticks = state.time_ticks;

        // Further ticks are inert
        tick(&mut state);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.end_reason, Some(EndReason::Boundary));
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::default();
        let mut a = GameState::new(&settings, 99999).unwrap();
        let mut b = GameState::new(&settings, 99999).unwrap();
        let turns = [Direction::Down, Direction::Right, Direction::Down, Direction::Left];

        for (i, dir) in turns.iter().cycle().take(40).enumerate() {
            if i % 3 == 0 {
                a.steering.apply(*dir, U);
                b.steering.apply(*dir, U);
            }
            assert_eq!(tick(&mut a), tick(&mut b));
        }
        assert_eq!(a.snake, b.snake);
        assert_eq!(a.food, b.food);
    }

    proptest! {
        #[test]
        fn prop_length_tracks_growth_and_segments_stay_distinct(
            seed in any::<u64>(),
            turns in proptest::collection::vec((0u8..4, any::<bool>()), 1..120),
        ) {
            let mut state = GameState::new(&Settings::default(), seed).unwrap();
            for (t, feed) in turns {
                let dir = match t {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                state.steering.apply(dir, U);

                // Sometimes drop the food right in front of the head
                let ahead = state.snake.head().offset(state.velocity());
                let fed = feed && state.grid.contains(ahead) && !state.snake.contains(ahead);
                if fed {
                    state.food = ahead;
                }

                let before = state.snake.len();
                let score_before = state.score;
                let outcome = tick(&mut state);
                if outcome != TickOutcome::Continue {
                    break;
                }

                let grew = state.score > score_before;
                prop_assert!(!fed || grew);
                let expected = if grew { before + 1 } else { before };
                prop_assert_eq!(state.snake.len(), expected);
                prop_assert!(state.snake.has_distinct_segments());
                prop_assert!(!state.snake.contains(state.food));
            }
        }
    }
}
