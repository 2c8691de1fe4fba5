//! Food placement

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use super::state::{Cell, Grid};
use crate::consts::FOOD_SAMPLE_ATTEMPTS;

/// Every cell of the board is occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardFull;

/// Pick a uniformly random unoccupied cell.
///
/// Rejection sampling handles the common sparse board. After
/// `FOOD_SAMPLE_ATTEMPTS` misses the free cells are enumerated and one is
/// chosen directly, so a crowded board never spins.
pub fn place_food<R: Rng + ?Sized>(
    occupied: &HashSet<Cell>,
    grid: &Grid,
    rng: &mut R,
) -> Result<Cell, BoardFull> {
    let columns = grid.columns();
    let rows = grid.rows();
    if columns <= 0 || rows <= 0 {
        return Err(BoardFull);
    }

    let on_board = occupied.iter().filter(|c| grid.contains(**c)).count();
    if on_board >= grid.cell_count() {
        return Err(BoardFull);
    }
    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let cell = grid.cell_at(rng.random_range(0..columns), rng.random_range(0..rows));
        if !occupied.contains(&cell) {
            return Ok(cell);
        }
    }

    grid.cells()
        .filter(|cell| !occupied.contains(cell))
        .choose(rng)
        .ok_or(BoardFull)
}
