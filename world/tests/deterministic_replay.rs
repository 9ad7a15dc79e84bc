use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use paper_snake_core::{CellCoord, Command, Difficulty, Direction, Event, GamePhase};
use paper_snake_world::{self as world, query, World};

const TICKS: usize = 600;
const FRAME: Duration = Duration::from_millis(16);

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(0xfeed, Difficulty::Medium);
    let second = replay(0xfeed, Difficulty::Medium);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.events > 0);
}

#[test]
fn replay_keeps_every_difficulty_within_speed_bounds() {
    for difficulty in Difficulty::ALL {
        let outcome = replay(7, difficulty);
        let profile = difficulty.profile();
        assert!(outcome
            .speeds
            .iter()
            .all(|speed| (profile.base_speed..=profile.max_speed).contains(speed)));
    }
}

#[test]
fn replay_never_places_food_on_the_snake() {
    let mut world = World::with_seed(99);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartGame {
            difficulty: Difficulty::Hard,
        },
        &mut events,
    );

    for _ in 0..TICKS {
        drive(&mut world);
        let snapshot = query::snapshot(&world);
        if let Some(food) = snapshot.food {
            assert!(!snapshot.snake.contains(&food));
            assert!(!snapshot
                .walls
                .iter()
                .any(|wall| wall.cells.contains(&food)));
        }
        let mut unique = snapshot.snake.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), snapshot.snake.len(), "snake overlaps itself");
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    trail: Vec<(u64, Vec<CellCoord>, Option<CellCoord>, u32)>,
    speeds: Vec<u32>,
    events: usize,
    log: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.trail.hash(&mut hasher);
        self.speeds.hash(&mut hasher);
        self.log.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(seed: u64, difficulty: Difficulty) -> ReplayOutcome {
    let mut world = World::with_seed(seed);
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame { difficulty }, &mut events);

    let mut outcome = ReplayOutcome {
        trail: Vec::new(),
        speeds: Vec::new(),
        events: events.len(),
        log: Vec::new(),
    };

    for _ in 0..TICKS {
        let events = drive(&mut world);
        outcome.events += events.len();
        outcome
            .log
            .extend(events.iter().map(|event| format!("{event:?}")));
        let snapshot = query::snapshot(&world);
        outcome
            .trail
            .push((snapshot.tick, snapshot.snake, snapshot.food, snapshot.score));
        outcome.speeds.push(snapshot.speed);
    }

    outcome
}

/// Steers toward the food, advances wall timers and ticks once; restarts after a game over.
fn drive(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    if query::phase(world) == GamePhase::GameOver {
        world::apply(world, Command::Restart, &mut events);
        return events;
    }

    if let Some(direction) = toward_food(world) {
        world::apply(world, Command::RequestDirection { direction }, &mut events);
    }
    world::apply(world, Command::AdvanceTime { dt: FRAME }, &mut events);
    world::apply(world, Command::Tick, &mut events);
    events
}

fn toward_food(world: &World) -> Option<Direction> {
    let food = query::snapshot(world).food?;
    let head = query::head(world);
    let direction = if food.column() > head.column() {
        Direction::Right
    } else if food.column() < head.column() {
        Direction::Left
    } else if food.row() > head.row() {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}
