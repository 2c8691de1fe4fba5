//! Terminal collision checks for a snake head

use super::state::{Cell, Grid, Snake};

/// Head is outside `[0, width) x [0, height)`
pub fn boundary_violation(head: Cell, grid: &Grid) -> bool {
    !grid.contains(head)
}

/// Would `new_head` land on the body after this move?
///
/// Without growth the tail vacates its cell this tick, so moving into the
/// current tail cell is legal. With growth the whole pre-move body stays.
pub fn self_collision(new_head: Cell, snake: &Snake, grows: bool) -> bool {
    let keep = if grows { snake.len() } else { snake.len() - 1 };
    snake.segments().take(keep).any(|cell| cell == new_head)
}
