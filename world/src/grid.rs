//! Pure spatial queries over the snake, walls, food and bonus.

use paper_snake_core::{Board, CellCoord, DeathCause};

use crate::{snake::Snake, walls::WallRegistry};

/// Borrowed view of everything that occupies board cells.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Occupancy<'a> {
    pub(crate) board: &'a Board,
    pub(crate) snake: &'a Snake,
    pub(crate) walls: &'a WallRegistry,
    pub(crate) food: Option<CellCoord>,
    pub(crate) bonus: Option<CellCoord>,
}

impl Occupancy<'_> {
    /// Reports why the snake cannot enter the cell, if it cannot.
    ///
    /// Only landed walls are solid; warning and falling walls are ignored.
    pub(crate) fn collision(&self, cell: CellCoord) -> Option<DeathCause> {
        if !self.board.contains(cell) {
            Some(DeathCause::Boundary)
        } else if self.snake.contains(cell) {
            Some(DeathCause::SelfCollision)
        } else if self.walls.is_solid(cell) {
            Some(DeathCause::Wall)
        } else {
            None
        }
    }

    /// Cells food may not spawn on: the snake and every wall regardless of stage.
    pub(crate) fn blocks_food(&self, cell: CellCoord) -> bool {
        self.snake.contains(cell) || self.walls.covers(cell)
    }

    /// Cells a bonus may not spawn on.
    pub(crate) fn blocks_bonus(&self, cell: CellCoord) -> bool {
        self.blocks_food(cell) || self.food == Some(cell)
    }

    /// Cells a new wall may not cover. Spacing from other walls is checked separately.
    pub(crate) fn blocks_wall(&self, cell: CellCoord) -> bool {
        self.snake.contains(cell) || self.food == Some(cell) || self.bonus == Some(cell)
    }

    /// Cells a wandering bonus may not step into.
    pub(crate) fn blocks_wander(&self, cell: CellCoord) -> bool {
        !self.board.contains(cell) || self.snake.contains(cell)
    }

    /// Enumerates every cell on the board that passes the provided filter.
    pub(crate) fn free_cells<F>(&self, mut blocked: F) -> Vec<CellCoord>
    where
        F: FnMut(CellCoord) -> bool,
    {
        self.board.cells().filter(|cell| !blocked(*cell)).collect()
    }
}
