//! Snake body and steering state.

use std::collections::VecDeque;

use paper_snake_core::{Board, CellCoord, Direction, INITIAL_SNAKE_LENGTH};

/// Ordered snake body with its committed and queued headings.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    body: VecDeque<CellCoord>,
    heading: Direction,
    queued: Direction,
}

impl Snake {
    /// Builds the starting snake: head at the board center, body trailing left.
    pub(crate) fn initial(board: &Board) -> Self {
        let center = board.center();
        let body = (0..INITIAL_SNAKE_LENGTH)
            .filter_map(|index| {
                let offset = u32::try_from(index).ok()?;
                center.translate(Direction::Left, offset)
            })
            .collect();
        Self {
            body,
            heading: Direction::Right,
            queued: Direction::Right,
        }
    }

    pub(crate) fn head(&self) -> CellCoord {
        self.body[0]
    }

    pub(crate) fn heading(&self) -> Direction {
        self.heading
    }

    pub(crate) fn queued(&self) -> Direction {
        self.queued
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.body.contains(&cell)
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.body.iter().copied()
    }

    /// Queues a new heading unless it reverses the committed heading or repeats the queue.
    pub(crate) fn request(&mut self, direction: Direction) -> bool {
        if direction == self.heading.opposite() || direction == self.queued {
            return false;
        }
        self.queued = direction;
        true
    }

    /// Commits the queued heading and returns it.
    pub(crate) fn commit_heading(&mut self) -> Direction {
        self.heading = self.queued;
        self.heading
    }

    /// Prepends a new head; drops and returns the tail unless growing.
    pub(crate) fn advance(&mut self, head: CellCoord, grow: bool) -> Option<CellCoord> {
        self.body.push_front(head);
        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cells(cells: Vec<CellCoord>, heading: Direction) -> Self {
        Self {
            body: cells.into(),
            heading,
            queued: heading,
        }
    }
}
