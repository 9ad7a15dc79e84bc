//! Scripted player that drives the session without a keyboard.

use paper_snake_core::{CellCoord, Difficulty, Direction, GamePhase, Intent, SimulationSnapshot};
use paper_snake_session::FrameSnapshot;

/// Greedy player: heads for the food along the shortest Manhattan route,
/// refusing moves that would end the game on the next tick.
#[derive(Debug)]
pub(crate) struct Autopilot {
    difficulty: Difficulty,
}

impl Autopilot {
    pub(crate) fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Intents for the upcoming frame.
    pub(crate) fn intents(&self, snapshot: &FrameSnapshot) -> Vec<Intent> {
        match snapshot.simulation.phase {
            GamePhase::Title => vec![Intent::SelectDifficulty(self.difficulty)],
            GamePhase::Paused => vec![Intent::PauseToggle],
            GamePhase::GameOver => vec![Intent::Restart],
            GamePhase::Playing => steer(&snapshot.simulation)
                .map(Intent::Steer)
                .into_iter()
                .collect(),
        }
    }
}

fn steer(simulation: &SimulationSnapshot) -> Option<Direction> {
    let head = simulation.head()?;
    let goal = simulation.food.unwrap_or_else(|| simulation.board.center());
    let reverse = simulation.heading.opposite();

    Direction::ALL
        .into_iter()
        .filter(|direction| *direction != reverse)
        .filter_map(|direction| {
            let cell = head.step(direction)?;
            is_safe(simulation, cell).then_some((direction, cell))
        })
        .min_by_key(|(direction, cell)| {
            (cell.manhattan_distance(goal), *direction != simulation.heading)
        })
        .map(|(direction, _)| direction)
}

fn is_safe(simulation: &SimulationSnapshot, cell: CellCoord) -> bool {
    simulation.board.contains(cell)
        && !simulation.snake.contains(&cell)
        && !simulation
            .walls
            .iter()
            .any(|wall| wall.cells.contains(&cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paper_snake_core::{Board, WallId, WallSnapshot, WallStage};

    fn simulation(snake: Vec<CellCoord>, heading: Direction, food: CellCoord) -> SimulationSnapshot {
        SimulationSnapshot {
            board: Board::default(),
            phase: GamePhase::Playing,
            difficulty: Difficulty::Medium,
            snake,
            heading,
            food: Some(food),
            bonus: None,
            walls: Vec::new(),
            score: 0,
            best: 0,
            speed: 7,
            tick: 0,
        }
    }

    fn straight_snake() -> Vec<CellCoord> {
        (0..5).map(|offset| CellCoord::new(14 - offset, 9)).collect()
    }

    #[test]
    fn heads_toward_food() {
        let sim = simulation(straight_snake(), Direction::Right, CellCoord::new(14, 2));
        assert_eq!(steer(&sim), Some(Direction::Up));
    }

    #[test]
    fn never_reverses_into_itself() {
        let sim = simulation(straight_snake(), Direction::Right, CellCoord::new(2, 9));
        let chosen = steer(&sim).expect("open board");
        assert_ne!(chosen, Direction::Left);
    }

    #[test]
    fn avoids_walls_in_any_stage() {
        let mut sim = simulation(straight_snake(), Direction::Right, CellCoord::new(20, 9));
        sim.walls.push(WallSnapshot {
            id: WallId::new(0),
            cells: [
                CellCoord::new(15, 8),
                CellCoord::new(15, 9),
                CellCoord::new(15, 10),
            ],
            stage: WallStage::Warning,
            progress: 0.2,
        });
        let chosen = steer(&sim).expect("perpendicular moves remain");
        assert!(matches!(chosen, Direction::Up | Direction::Down));
    }

    #[test]
    fn avoids_the_board_edge() {
        let snake = vec![CellCoord::new(27, 0), CellCoord::new(26, 0)];
        let sim = simulation(snake, Direction::Right, CellCoord::new(27, 0));
        assert_eq!(steer(&sim), Some(Direction::Down));
    }

    #[test]
    fn menus_are_answered_by_phase() {
        let pilot = Autopilot::new(Difficulty::Hard);
        let mut frame = FrameSnapshot {
            simulation: simulation(straight_snake(), Direction::Right, CellCoord::new(20, 9)),
            menu: &[],
            focus: 0,
            muted: false,
        };

        frame.simulation.phase = GamePhase::Title;
        assert_eq!(
            pilot.intents(&frame),
            vec![Intent::SelectDifficulty(Difficulty::Hard)]
        );
        frame.simulation.phase = GamePhase::GameOver;
        assert_eq!(pilot.intents(&frame), vec![Intent::Restart]);
        frame.simulation.phase = GamePhase::Playing;
        assert_eq!(pilot.intents(&frame), vec![Intent::Steer(Direction::Right)]);
    }
}
