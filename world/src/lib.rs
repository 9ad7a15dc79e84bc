#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Paper Snake.

mod bonus;
mod food;
mod grid;
mod snake;
mod walls;

use paper_snake_core::{
    Board, CellCoord, Command, DeathCause, Difficulty, DifficultyProfile, Event, GamePhase,
    MAX_WALLS, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    bonus::{BonusContext, BonusState},
    grid::Occupancy,
    snake::Snake,
    walls::WallRegistry,
};

const DEFAULT_SEED: u64 = 0x7a9e_5c11_03d8_b4f6;

/// Speed lost when the snake swallows a bonus.
const BONUS_SPEED_PENALTY: u32 = 2;

/// Represents the authoritative Paper Snake world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    phase: GamePhase,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    snake: Snake,
    food: Option<CellCoord>,
    bonus: BonusState,
    walls: WallRegistry,
    wall_spawn_timer: i64,
    score: u32,
    best: u32,
    speed: u32,
    tick_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world on the default board, waiting on the title screen.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a new world whose random decisions derive from the provided seed.
    ///
    /// Two worlds built from the same seed and fed the same commands produce
    /// identical event streams.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let board = Board::default();
        let difficulty = Difficulty::default();
        let profile = difficulty.profile();
        let mut world = Self {
            banner: WELCOME_BANNER,
            snake: Snake::initial(&board),
            board,
            phase: GamePhase::Title,
            difficulty,
            profile,
            food: None,
            bonus: BonusState::Absent { spawn_timer: 0 },
            walls: WallRegistry::new(),
            wall_spawn_timer: 0,
            score: 0,
            best: 0,
            speed: profile.base_speed,
            tick_index: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        world.reset();
        world
    }

    /// Restores the per-game state: snake, food, score, speed, bonus and walls.
    fn reset(&mut self) {
        self.snake = Snake::initial(&self.board);
        self.walls.clear();
        self.score = 0;
        self.speed = self.profile.base_speed;
        self.tick_index = 0;
        self.bonus = BonusState::Absent {
            spawn_timer: bonus::respawn_delay(self.speed, &mut self.rng),
        };
        self.food = food::place_food(
            &Occupancy {
                board: &self.board,
                snake: &self.snake,
                walls: &self.walls,
                food: None,
                bonus: None,
            },
            &mut self.rng,
        );
        self.wall_spawn_timer = walls::spawn_interval(&self.profile, self.speed, &mut self.rng);
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        tracing::debug!(from = ?self.phase, to = ?phase, "phase changed");
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn begin_game(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
        self.reset();
        out_events.push(Event::GameStarted { difficulty });
        if let Some(cell) = self.food {
            out_events.push(Event::FoodSpawned { cell });
        }
        self.set_phase(GamePhase::Playing, out_events);
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);

        let from = self.snake.head();
        let heading = self.snake.commit_heading();
        let Some(next) = from.step(heading) else {
            self.die(DeathCause::Boundary, out_events);
            return;
        };

        let blocked = Occupancy {
            board: &self.board,
            snake: &self.snake,
            walls: &self.walls,
            food: self.food,
            bonus: self.bonus.cell(),
        }
        .collision(next);
        if let Some(cause) = blocked {
            self.die(cause, out_events);
            return;
        }

        let grew = self.food == Some(next);
        let _ = self.snake.advance(next, grew);
        out_events.push(Event::SnakeAdvanced {
            from,
            to: next,
            grew,
        });

        if grew {
            self.eat(next, out_events);
            if self.phase != GamePhase::Playing {
                return;
            }
        }

        self.collect_bonus(out_events);
        self.update_bonus(out_events);
        self.update_wall_timer(out_events);
    }

    fn die(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        tracing::info!(?cause, score = self.score, length = self.snake.len(), "snake died");
        out_events.push(Event::SnakeDied {
            cause,
            score: self.score,
        });
        self.set_phase(GamePhase::GameOver, out_events);
    }

    fn eat(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(1);
        out_events.push(Event::FoodEaten {
            cell,
            score: self.score,
        });

        if self.score > self.best {
            self.best = self.score;
            out_events.push(Event::BestScoreImproved { best: self.best });
        }

        if self.profile.accel_every > 0 && self.score % self.profile.accel_every == 0 {
            let speed = self.profile.clamp_speed(self.speed.saturating_add(1));
            self.change_speed(speed, out_events);
        }

        self.food = food::place_food(
            &Occupancy {
                board: &self.board,
                snake: &self.snake,
                walls: &self.walls,
                food: None,
                bonus: self.bonus.cell(),
            },
            &mut self.rng,
        );
        match self.food {
            Some(cell) => out_events.push(Event::FoodSpawned { cell }),
            None => {
                tracing::info!(score = self.score, "board cleared");
                out_events.push(Event::BoardCleared { score: self.score });
                self.set_phase(GamePhase::GameOver, out_events);
            }
        }
    }

    fn change_speed(&mut self, speed: u32, out_events: &mut Vec<Event>) {
        if speed != self.speed {
            self.speed = speed;
            out_events.push(Event::SpeedChanged { speed });
        }
    }

    fn collect_bonus(&mut self, out_events: &mut Vec<Event>) {
        let slowed = self
            .speed
            .saturating_sub(BONUS_SPEED_PENALTY)
            .max(self.profile.base_speed);
        let Some(cell) = bonus::consume(&mut self.bonus, self.snake.head(), slowed, &mut self.rng)
        else {
            return;
        };
        self.change_speed(slowed, out_events);
        out_events.push(Event::BonusCollected {
            cell,
            speed: self.speed,
        });
    }

    fn update_bonus(&mut self, out_events: &mut Vec<Event>) {
        let context = BonusContext {
            occupancy: Occupancy {
                board: &self.board,
                snake: &self.snake,
                walls: &self.walls,
                food: self.food,
                bonus: self.bonus.cell(),
            },
            profile: &self.profile,
            head: self.snake.head(),
            speed: self.speed,
            score: self.score,
        };
        bonus::update(&mut self.bonus, &context, &mut self.rng, out_events);
    }

    fn update_wall_timer(&mut self, out_events: &mut Vec<Event>) {
        self.wall_spawn_timer = self.wall_spawn_timer.saturating_sub(1);
        if self.wall_spawn_timer > 0 || self.score < self.profile.wall_threshold {
            return;
        }

        if self.walls.len() < MAX_WALLS {
            let planned = walls::plan_wall(
                &Occupancy {
                    board: &self.board,
                    snake: &self.snake,
                    walls: &self.walls,
                    food: self.food,
                    bonus: self.bonus.cell(),
                },
                self.snake.head(),
                self.snake.heading(),
                &mut self.rng,
            );
            if let Some(cells) = planned {
                let wall = self.walls.insert(cells);
                tracing::debug!(wall = wall.get(), "wall warning started");
                out_events.push(Event::WallSpawned { wall, cells });
            }
        }

        self.wall_spawn_timer = walls::spawn_interval(&self.profile, self.speed, &mut self.rng);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that the current phase does not permit are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { board } => {
            world.board = board;
            world.reset();
            out_events.push(Event::BoardConfigured { board });
            world.set_phase(GamePhase::Title, out_events);
        }
        Command::ConfigureBestScore { best } => {
            world.best = best;
        }
        Command::StartGame { difficulty } => {
            if world.phase == GamePhase::Title {
                world.begin_game(difficulty, out_events);
            }
        }
        Command::Restart => {
            if world.phase == GamePhase::GameOver {
                world.begin_game(world.difficulty, out_events);
            }
        }
        Command::TogglePause => match world.phase {
            GamePhase::Playing => world.set_phase(GamePhase::Paused, out_events),
            GamePhase::Paused => world.set_phase(GamePhase::Playing, out_events),
            GamePhase::Title | GamePhase::GameOver => {}
        },
        Command::Resume => {
            if world.phase == GamePhase::Paused {
                world.set_phase(GamePhase::Playing, out_events);
            }
        }
        Command::QuitToTitle => {
            if matches!(world.phase, GamePhase::Paused | GamePhase::GameOver) {
                world.reset();
                world.set_phase(GamePhase::Title, out_events);
            }
        }
        Command::RequestDirection { direction } => {
            if !world.phase.is_running() {
                return;
            }
            if world.snake.request(direction) {
                out_events.push(Event::TurnAccepted { direction });
            } else {
                out_events.push(Event::TurnRejected {
                    requested: direction,
                });
            }
        }
        Command::Tick => {
            if world.phase == GamePhase::Playing {
                world.step(out_events);
            }
        }
        Command::AdvanceTime { dt } => {
            if world.phase == GamePhase::Playing {
                world.walls.advance(dt, world.profile.wall_warning, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use paper_snake_core::{
        Board, CellCoord, Difficulty, DifficultyProfile, Direction, GamePhase, SimulationSnapshot,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current game phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Difficulty of the current or most recent game.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Tuning constants of the active difficulty.
    #[must_use]
    pub fn profile(world: &World) -> &DifficultyProfile {
        &world.profile
    }

    /// Board dimensions in effect.
    #[must_use]
    pub fn board(world: &World) -> Board {
        world.board
    }

    /// Ticks per second the stepper should use.
    #[must_use]
    pub fn speed(world: &World) -> u32 {
        world.speed
    }

    /// Score of the current game.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Best score known to this world.
    #[must_use]
    pub fn best(world: &World) -> u32 {
        world.best
    }

    /// Cell currently occupied by the snake's head.
    #[must_use]
    pub fn head(world: &World) -> CellCoord {
        world.snake.head()
    }

    /// Heading committed on the most recent tick.
    #[must_use]
    pub fn heading(world: &World) -> Direction {
        world.snake.heading()
    }

    /// Heading that the next tick will commit.
    #[must_use]
    pub fn queued_direction(world: &World) -> Direction {
        world.snake.queued()
    }

    /// Number of cells in the snake body.
    #[must_use]
    pub fn snake_length(world: &World) -> usize {
        world.snake.len()
    }

    /// Number of ticks simulated since the current game started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only snapshot of everything a presentation layer draws.
    #[must_use]
    pub fn snapshot(world: &World) -> SimulationSnapshot {
        SimulationSnapshot {
            board: world.board,
            phase: world.phase,
            difficulty: world.difficulty,
            snake: world.snake.cells().collect(),
            heading: world.snake.heading(),
            food: world.food,
            bonus: world.bonus.snapshot(),
            walls: world.walls.snapshots(world.profile.wall_warning),
            score: world.score,
            best: world.best,
            speed: world.speed,
            tick: world.tick_index,
        }
    }
}
