//! Food placement.

use paper_snake_core::CellCoord;
use rand::{seq::SliceRandom, Rng};

use crate::grid::Occupancy;

/// Random probes attempted before falling back to enumerating free cells.
const REJECTION_ATTEMPTS: usize = 64;

/// Picks a uniformly random cell that is neither snake nor wall.
///
/// Returns `None` only when every cell on the board is occupied.
pub(crate) fn place_food<R: Rng>(occupancy: &Occupancy<'_>, rng: &mut R) -> Option<CellCoord> {
    let board = occupancy.board;
    for _ in 0..REJECTION_ATTEMPTS {
        let cell = CellCoord::new(
            rng.gen_range(0..board.columns()),
            rng.gen_range(0..board.rows()),
        );
        if !occupancy.blocks_food(cell) {
            return Some(cell);
        }
    }

    let free = occupancy.free_cells(|cell| occupancy.blocks_food(cell));
    free.choose(rng).copied()
}
