//! Wandering bonus target.

use paper_snake_core::{BonusSnapshot, CellCoord, DifficultyProfile, Direction, Event};
use rand::{seq::SliceRandom, Rng};

use crate::grid::Occupancy;

/// Closest Manhattan distance from the head at which a bonus may spawn.
const MIN_SPAWN_DISTANCE: u32 = 4;
/// Lower bound for the furthest spawn distance.
const MIN_SPAWN_REACH: u32 = 5;

/// Active bonus with its age counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bonus {
    pub(crate) cell: CellCoord,
    pub(crate) heading: Direction,
    pub(crate) ticks_alive: u32,
    pub(crate) max_ticks: u32,
    pub(crate) move_counter: u32,
}

/// Bonus lifecycle: either waiting for the spawn timer or wandering the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BonusState {
    Absent { spawn_timer: i64 },
    Active(Bonus),
}

impl BonusState {
    pub(crate) fn cell(&self) -> Option<CellCoord> {
        match self {
            Self::Absent { .. } => None,
            Self::Active(bonus) => Some(bonus.cell),
        }
    }

    pub(crate) fn snapshot(&self) -> Option<BonusSnapshot> {
        match self {
            Self::Absent { .. } => None,
            Self::Active(bonus) => Some(BonusSnapshot {
                cell: bonus.cell,
                heading: bonus.heading,
                ticks_alive: bonus.ticks_alive,
                max_ticks: bonus.max_ticks,
            }),
        }
    }
}

/// Inputs the bonus needs from the rest of the world for a single tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BonusContext<'a> {
    pub(crate) occupancy: Occupancy<'a>,
    pub(crate) profile: &'a DifficultyProfile,
    pub(crate) head: CellCoord,
    pub(crate) speed: u32,
    pub(crate) score: u32,
}

/// Ticks until the next spawn attempt: `round(speed * (8 + r * 7))`.
pub(crate) fn respawn_delay<R: Rng>(speed: u32, rng: &mut R) -> i64 {
    let seconds = 8.0 + rng.gen::<f64>() * 7.0;
    (f64::from(speed) * seconds).round() as i64
}

/// Removes the bonus when the head sits on it, returning the consumed cell.
pub(crate) fn consume<R: Rng>(
    state: &mut BonusState,
    head: CellCoord,
    speed: u32,
    rng: &mut R,
) -> Option<CellCoord> {
    let cell = state.cell().filter(|cell| *cell == head)?;
    *state = BonusState::Absent {
        spawn_timer: respawn_delay(speed, rng),
    };
    Some(cell)
}

/// Runs one tick of the bonus state machine.
pub(crate) fn update<R: Rng>(
    state: &mut BonusState,
    context: &BonusContext<'_>,
    rng: &mut R,
    out: &mut Vec<Event>,
) {
    match state {
        BonusState::Absent { spawn_timer } => {
            *spawn_timer = spawn_timer.saturating_sub(1);
            if *spawn_timer > 0 || context.score < context.profile.bonus_threshold {
                return;
            }
            // A failed attempt leaves the timer expired so the next tick retries.
            if let Some(bonus) = spawn(context, rng) {
                tracing::debug!(
                    column = bonus.cell.column(),
                    row = bonus.cell.row(),
                    max_ticks = bonus.max_ticks,
                    "bonus spawned"
                );
                out.push(Event::BonusSpawned {
                    cell: bonus.cell,
                    max_ticks: bonus.max_ticks,
                });
                *state = BonusState::Active(bonus);
            }
        }
        BonusState::Active(bonus) => {
            bonus.ticks_alive = bonus.ticks_alive.saturating_add(1);
            if bonus.ticks_alive >= bonus.max_ticks {
                let cell = bonus.cell;
                *state = BonusState::Absent {
                    spawn_timer: respawn_delay(context.speed, rng),
                };
                out.push(Event::BonusExpired { cell });
                return;
            }

            bonus.move_counter += 1;
            if bonus.move_counter < context.profile.bonus_move_every {
                return;
            }
            bonus.move_counter = 0;
            wander(bonus, &context.occupancy, rng, out);
        }
    }
}

fn spawn<R: Rng>(context: &BonusContext<'_>, rng: &mut R) -> Option<Bonus> {
    let speed = f64::from(context.speed);
    let lifetime = f64::from(context.profile.bonus_lifetime);
    let reach = ((speed * lifetime) / 3.0).floor() as u32;
    let max_distance = reach.max(MIN_SPAWN_REACH);

    let occupancy = &context.occupancy;
    let candidates = occupancy.free_cells(|cell| {
        let distance = cell.manhattan_distance(context.head);
        distance < MIN_SPAWN_DISTANCE || distance > max_distance || occupancy.blocks_bonus(cell)
    });
    let cell = *candidates.choose(rng)?;
    let heading = *Direction::ALL.choose(rng)?;
    let max_ticks = ((speed * lifetime).round() as u32).max(1);

    Some(Bonus {
        cell,
        heading,
        ticks_alive: 0,
        max_ticks,
        move_counter: 0,
    })
}

fn wander<R: Rng>(bonus: &mut Bonus, occupancy: &Occupancy<'_>, rng: &mut R, out: &mut Vec<Event>) {
    let from = bonus.cell;
    let open = |direction: Direction| {
        from.step(direction)
            .filter(|cell| !occupancy.blocks_wander(*cell))
    };

    let destination = match open(bonus.heading) {
        Some(cell) => Some(cell),
        None => {
            let mut order = Direction::ALL;
            order.shuffle(rng);
            match order
                .iter()
                .find_map(|direction| open(*direction).map(|cell| (*direction, cell)))
            {
                Some((direction, cell)) => {
                    bonus.heading = direction;
                    Some(cell)
                }
                None => {
                    bonus.heading = order[0];
                    None
                }
            }
        }
    };

    if let Some(to) = destination {
        bonus.cell = to;
        out.push(Event::BonusMoved { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{snake::Snake, walls::WallRegistry};
    use paper_snake_core::{Board, Difficulty};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        board: Board,
        snake: Snake,
        walls: WallRegistry,
        profile: DifficultyProfile,
    }

    impl Fixture {
        fn new(snake: Snake) -> Self {
            Self {
                board: Board::default(),
                snake,
                walls: WallRegistry::new(),
                profile: Difficulty::Medium.profile(),
            }
        }

        fn context(&self, score: u32, bonus: Option<CellCoord>) -> BonusContext<'_> {
            BonusContext {
                occupancy: Occupancy {
                    board: &self.board,
                    snake: &self.snake,
                    walls: &self.walls,
                    food: None,
                    bonus,
                },
                profile: &self.profile,
                head: self.snake.head(),
                speed: 7,
                score,
            }
        }

        fn tick(&self, state: &mut BonusState, score: u32, rng: &mut ChaCha8Rng) -> Vec<Event> {
            let context = self.context(score, state.cell());
            let mut events = Vec::new();
            update(state, &context, rng, &mut events);
            events
        }
    }

    fn active(cell: CellCoord, heading: Direction, ticks_alive: u32, max_ticks: u32) -> BonusState {
        BonusState::Active(Bonus {
            cell,
            heading,
            ticks_alive,
            max_ticks,
            move_counter: 0,
        })
    }

    #[test]
    fn expired_bonus_despawns_on_next_update() {
        let fixture = Fixture::new(Snake::initial(&Board::default()));
        let mut state = active(CellCoord::new(3, 3), Direction::Up, 40, 40);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let events = fixture.tick(&mut state, 10, &mut rng);

        assert_eq!(events, vec![Event::BonusExpired { cell: CellCoord::new(3, 3) }]);
        match state {
            BonusState::Absent { spawn_timer } => assert!((56..=105).contains(&spawn_timer)),
            BonusState::Active(_) => panic!("bonus should have despawned"),
        }
    }

    #[test]
    fn spawn_waits_for_score_threshold() {
        let fixture = Fixture::new(Snake::initial(&Board::default()));
        let mut state = BonusState::Absent { spawn_timer: 1 };
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        assert!(fixture.tick(&mut state, 1, &mut rng).is_empty());
        assert_eq!(state, BonusState::Absent { spawn_timer: 0 });

        let events = fixture.tick(&mut state, 2, &mut rng);
        assert!(matches!(state, BonusState::Active(_)));
        assert!(matches!(events.as_slice(), [Event::BonusSpawned { .. }]));
    }

    #[test]
    fn spawned_bonus_lies_within_distance_band() {
        let fixture = Fixture::new(Snake::initial(&Board::default()));
        let head = fixture.snake.head();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..64 {
            let mut state = BonusState::Absent { spawn_timer: 0 };
            let _ = fixture.tick(&mut state, 5, &mut rng);
            let BonusState::Active(bonus) = state else {
                panic!("open board always has candidates");
            };
            let distance = bonus.cell.manhattan_distance(head);
            // speed 7 * lifetime 5 / 3 = 11
            assert!((4..=11).contains(&distance), "distance {distance}");
            assert!(!fixture.snake.contains(bonus.cell));
            assert_eq!(bonus.max_ticks, 35);
            assert_eq!(bonus.ticks_alive, 0);
        }
    }

    #[test]
    fn failed_spawn_keeps_timer_expired() {
        let board = Board::default();
        let center = board.center();
        let mut cells = vec![center];
        cells.extend(
            board
                .cells()
                .filter(|cell| (4..=11).contains(&cell.manhattan_distance(center))),
        );
        let fixture = Fixture::new(Snake::from_cells(cells, Direction::Right));
        let mut state = BonusState::Absent { spawn_timer: 0 };
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        assert!(fixture.tick(&mut state, 9, &mut rng).is_empty());
        assert_eq!(state, BonusState::Absent { spawn_timer: -1 });
    }

    #[test]
    fn bonus_moves_every_configured_tick() {
        let fixture = Fixture::new(Snake::initial(&Board::default()));
        let start = CellCoord::new(5, 3);
        let mut state = active(start, Direction::Down, 0, 100);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(fixture.tick(&mut state, 9, &mut rng).is_empty());
        assert_eq!(
            fixture.tick(&mut state, 9, &mut rng),
            vec![Event::BonusMoved {
                from: start,
                to: CellCoord::new(5, 4)
            }]
        );
    }

    #[test]
    fn blocked_bonus_turns_toward_open_cell() {
        let fixture = Fixture::new(Snake::initial(&Board::default()));
        let corner = CellCoord::new(0, 0);
        let mut state = active(corner, Direction::Up, 0, 100);
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let _ = fixture.tick(&mut state, 9, &mut rng);
        let _ = fixture.tick(&mut state, 9, &mut rng);

        let BonusState::Active(bonus) = state else {
            panic!("bonus should still be alive");
        };
        assert!(matches!(bonus.heading, Direction::Down | Direction::Right));
        assert_eq!(corner.manhattan_distance(bonus.cell), 1);
    }

    #[test]
    fn boxed_in_bonus_stays_put() {
        let snake = Snake::from_cells(
            vec![CellCoord::new(1, 1), CellCoord::new(1, 0), CellCoord::new(0, 1)],
            Direction::Down,
        );
        let fixture = Fixture::new(snake);
        let corner = CellCoord::new(0, 0);
        let mut state = BonusState::Active(Bonus {
            cell: corner,
            heading: Direction::Up,
            ticks_alive: 0,
            max_ticks: 100,
            move_counter: 1,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert!(fixture.tick(&mut state, 9, &mut rng).is_empty());
        assert_eq!(state.cell(), Some(corner));
    }

    #[test]
    fn consuming_resets_spawn_timer() {
        let mut state = active(CellCoord::new(4, 4), Direction::Up, 3, 40);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        assert_eq!(consume(&mut state, CellCoord::new(4, 5), 7, &mut rng), None);
        assert_eq!(
            consume(&mut state, CellCoord::new(4, 4), 7, &mut rng),
            Some(CellCoord::new(4, 4))
        );
        assert!(matches!(state, BonusState::Absent { spawn_timer } if spawn_timer >= 56));
    }
}
