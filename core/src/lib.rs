#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Paper Snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate device input
//! into [`Intent`] values, systems turn intents and elapsed time into
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that presentation layers treat as audio and visual cues. Read-only
//! [`SimulationSnapshot`] values expose the state required to draw a frame.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Paper Snake.";

/// Number of columns on the default board.
pub const DEFAULT_COLUMNS: u32 = 28;
/// Number of rows on the default board.
pub const DEFAULT_ROWS: u32 = 18;
/// Smallest column count that leaves room for the starting snake and wall margins.
pub const MIN_COLUMNS: u32 = 12;
/// Smallest row count that leaves room for wall margins above and below the snake.
pub const MIN_ROWS: u32 = 8;

/// Number of cells composing the snake when a game starts.
pub const INITIAL_SNAKE_LENGTH: usize = 5;
/// Number of cells composing a single falling wall.
pub const WALL_LENGTH: usize = 3;
/// Maximum number of walls that may exist during a single game.
pub const MAX_WALLS: usize = 5;
/// Duration of the drop animation between the warning and landed stages.
pub const WALL_FALL_DURATION: Duration = Duration::from_millis(300);

/// Phases of the game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen offering the difficulty selection menu.
    #[default]
    Title,
    /// Active gameplay where ticks advance the simulation.
    Playing,
    /// Gameplay suspended behind the pause menu.
    Paused,
    /// The snake died or the board was cleared.
    GameOver,
}

impl GamePhase {
    /// Reports whether a game is in progress, regardless of whether it is paused.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

/// Difficulty levels offered on the title screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Slow snake, late obstacles and long-lived bonuses.
    Easy,
    /// Balanced defaults.
    Medium,
    /// Fast snake with early and frequent obstacles.
    Hard,
}

impl Difficulty {
    /// Every difficulty in menu order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Returns the tuning constants associated with the difficulty.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                base_speed: 6,
                max_speed: 13,
                accel_every: 5,
                bonus_threshold: 3,
                bonus_move_every: 3,
                bonus_lifetime: 6.0,
                wall_threshold: 8,
                wall_interval_min: 14.0,
                wall_interval_max: 22.0,
                wall_warning: Duration::from_millis(2_200),
            },
            Self::Medium => DifficultyProfile {
                base_speed: 7,
                max_speed: 16,
                accel_every: 4,
                bonus_threshold: 2,
                bonus_move_every: 2,
                bonus_lifetime: 5.0,
                wall_threshold: 5,
                wall_interval_min: 10.0,
                wall_interval_max: 16.0,
                wall_warning: Duration::from_millis(1_600),
            },
            Self::Hard => DifficultyProfile {
                base_speed: 9,
                max_speed: 20,
                accel_every: 3,
                bonus_threshold: 1,
                bonus_move_every: 2,
                bonus_lifetime: 4.0,
                wall_threshold: 3,
                wall_interval_min: 7.0,
                wall_interval_max: 12.0,
                wall_warning: Duration::from_millis(1_100),
            },
        }
    }

    /// Human readable label used by menus and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a difficulty name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`; expected easy, medium or hard")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(value.to_owned())),
        }
    }
}

/// Tuning constants that govern speed, bonus and wall behaviour for a difficulty.
///
/// Durations expressed in "seconds" are multiplied by the current speed to
/// obtain a tick count, so faster snakes see proportionally more ticks within
/// the same real-time window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    /// Ticks per second when a game starts and the floor for speed reductions.
    pub base_speed: u32,
    /// Ceiling for speed increases.
    pub max_speed: u32,
    /// Speed rises by one each time the score reaches a multiple of this value.
    pub accel_every: u32,
    /// Minimum score before bonuses start spawning.
    pub bonus_threshold: u32,
    /// Number of ticks between two bonus movement steps.
    pub bonus_move_every: u32,
    /// Bonus lifetime in seconds at the speed observed when it spawned.
    pub bonus_lifetime: f32,
    /// Minimum score before walls start spawning.
    pub wall_threshold: u32,
    /// Lower bound of the wall spawn interval in seconds.
    pub wall_interval_min: f32,
    /// Upper bound of the wall spawn interval in seconds.
    pub wall_interval_max: f32,
    /// Real-time duration of the blinking warning stage.
    pub wall_warning: Duration,
}

impl DifficultyProfile {
    /// Clamps the provided speed into the profile's permitted range.
    #[must_use]
    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(self.base_speed, self.max_speed)
    }
}

/// Cardinal movement directions on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed canonical order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset as `(column, row)` deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Returns the two directions perpendicular to this one.
    #[must_use]
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Self::Up | Self::Down => [Self::Left, Self::Right],
            Self::Left | Self::Right => [Self::Up, Self::Down],
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Computes the Chebyshev (king move) distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Moves `distance` cells along `direction`.
    ///
    /// Returns `None` when the move would leave the non-negative quadrant.
    /// Upper bounds are not checked; see [`Board::contains`].
    #[must_use]
    pub fn translate(self, direction: Direction, distance: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = offset(self.column, dx, distance)?;
        let row = offset(self.row, dy, distance)?;
        Some(Self::new(column, row))
    }

    /// Moves a single cell along `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        self.translate(direction, 1)
    }
}

fn offset(value: u32, delta: i32, distance: u32) -> Option<u32> {
    match delta {
        0 => Some(value),
        d if d > 0 => value.checked_add(distance),
        _ => value.checked_sub(distance),
    }
}

/// Reasons a board configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The requested dimensions cannot host the starting snake and wall margins.
    #[error(
        "board of {columns}x{rows} cells is smaller than the {}x{} minimum",
        MIN_COLUMNS,
        MIN_ROWS
    )]
    TooSmall {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
}

/// Dimensions of the rectangular playing field measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    columns: u32,
    rows: u32,
}

impl Board {
    /// Creates a board, rejecting dimensions below [`MIN_COLUMNS`] x [`MIN_ROWS`].
    pub fn new(columns: u32, rows: u32) -> Result<Self, BoardError> {
        if columns < MIN_COLUMNS || rows < MIN_ROWS {
            return Err(BoardError::TooSmall { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Number of columns contained in the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Reports whether the cell lies within the board bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column < self.columns && cell.row < self.rows
    }

    /// Reports whether the cell keeps at least `margin` cells to every edge.
    #[must_use]
    pub fn keeps_margin(&self, cell: CellCoord, margin: u32) -> bool {
        cell.column >= margin
            && cell.row >= margin
            && cell.column.saturating_add(margin) < self.columns
            && cell.row.saturating_add(margin) < self.rows
    }

    /// Center cell, rounding toward the origin.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// Unique identifier assigned to a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Lifecycle stage of a wall as observed by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallStage {
    /// Blinking placeholder; not solid.
    Warning,
    /// Drop animation in progress; not solid.
    Falling,
    /// Solid obstacle for the rest of the game.
    Landed,
}

/// Reasons the snake may die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The head would have left the board.
    Boundary,
    /// The head would have entered a cell occupied by the snake.
    SelfCollision,
    /// The head would have entered a landed wall.
    Wall,
}

/// Abstract input produced by device adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Requests that the snake head toward the provided direction.
    Steer(Direction),
    /// Pauses a running game or resumes a paused one.
    PauseToggle,
    /// Moves the menu focus by the provided offset, wrapping at both ends.
    Navigate(i32),
    /// Activates the focused menu item.
    Confirm,
    /// Starts a game directly at the provided difficulty from the title screen.
    SelectDifficulty(Difficulty),
    /// Toggles audio output.
    MuteToggle,
    /// Restarts after a game over using the previous difficulty.
    Restart,
    /// Leaves a paused or finished game for the title screen.
    QuitToTitle,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the board dimensions and returns to the title screen.
    ConfigureBoard {
        /// Dimensions of the new board.
        board: Board,
    },
    /// Seeds the best score restored from persistent storage.
    ConfigureBestScore {
        /// Best score achieved in earlier sessions.
        best: u32,
    },
    /// Resets the simulation with the provided difficulty and begins playing.
    StartGame {
        /// Difficulty selected by the player.
        difficulty: Difficulty,
    },
    /// Resets the simulation with the current difficulty after a game over.
    Restart,
    /// Switches between the playing and paused phases.
    TogglePause,
    /// Resumes a paused game.
    Resume,
    /// Abandons the current game and returns to the title screen.
    QuitToTitle,
    /// Queues a direction change for the next tick.
    RequestDirection {
        /// Direction requested by the player.
        direction: Direction,
    },
    /// Advances the simulation by exactly one discrete step.
    Tick,
    /// Advances real-time animation timers by the provided delta.
    AdvanceTime {
        /// Duration of real time that elapsed since the previous frame.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the board dimensions changed.
    BoardConfigured {
        /// Dimensions now in effect.
        board: Board,
    },
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Announces that a fresh game began.
    GameStarted {
        /// Difficulty governing the new game.
        difficulty: Difficulty,
    },
    /// Confirms that a direction change was queued while the game was running.
    TurnAccepted {
        /// Direction that will be committed on the next tick.
        direction: Direction,
    },
    /// Reports that a direction change was ignored while the game was running.
    TurnRejected {
        /// Direction that was requested.
        requested: Direction,
    },
    /// Confirms that the snake moved one cell.
    SnakeAdvanced {
        /// Cell the head occupied before the move.
        from: CellCoord,
        /// Cell the head occupies after the move.
        to: CellCoord,
        /// Indicates whether the tail was kept because food was eaten.
        grew: bool,
    },
    /// Announces that the snake was blocked and the game ended.
    SnakeDied {
        /// Obstacle that ended the game.
        cause: DeathCause,
        /// Score reached before dying.
        score: u32,
    },
    /// Confirms that the snake ate the food.
    FoodEaten {
        /// Cell the food occupied.
        cell: CellCoord,
        /// Score after eating.
        score: u32,
    },
    /// Confirms that new food was placed.
    FoodSpawned {
        /// Cell the food occupies.
        cell: CellCoord,
    },
    /// Reports that the best score was surpassed.
    BestScoreImproved {
        /// New best score.
        best: u32,
    },
    /// Reports that the simulation speed changed.
    SpeedChanged {
        /// Ticks per second now in effect.
        speed: u32,
    },
    /// Confirms that a bonus appeared.
    BonusSpawned {
        /// Cell the bonus occupies.
        cell: CellCoord,
        /// Number of ticks the bonus survives unless consumed.
        max_ticks: u32,
    },
    /// Confirms that the bonus wandered to a neighbouring cell.
    BonusMoved {
        /// Cell the bonus occupied before moving.
        from: CellCoord,
        /// Cell the bonus occupies after moving.
        to: CellCoord,
    },
    /// Confirms that the snake consumed the bonus.
    BonusCollected {
        /// Cell the bonus occupied.
        cell: CellCoord,
        /// Speed after the consumption penalty was applied.
        speed: u32,
    },
    /// Reports that the bonus expired without being consumed.
    BonusExpired {
        /// Cell the bonus occupied.
        cell: CellCoord,
    },
    /// Confirms that a wall entered its warning stage.
    WallSpawned {
        /// Identifier assigned to the wall.
        wall: WallId,
        /// Cells the wall will occupy once landed.
        cells: [CellCoord; WALL_LENGTH],
    },
    /// Reports that a wall began its drop animation.
    WallFalling {
        /// Identifier of the falling wall.
        wall: WallId,
    },
    /// Reports that a wall landed and became solid. Consumers use this to
    /// trigger the landing sound and camera shake.
    WallLanded {
        /// Identifier of the landed wall.
        wall: WallId,
        /// Cells now blocked by the wall.
        cells: [CellCoord; WALL_LENGTH],
    },
    /// Reports that no free cell remained for food, ending the game as a win.
    BoardCleared {
        /// Final score.
        score: u32,
    },
}

/// Immutable representation of the active bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BonusSnapshot {
    /// Cell the bonus occupies.
    pub cell: CellCoord,
    /// Direction the bonus currently wanders toward.
    pub heading: Direction,
    /// Ticks elapsed since the bonus spawned.
    pub ticks_alive: u32,
    /// Ticks after which the bonus expires.
    pub max_ticks: u32,
}

impl BonusSnapshot {
    /// Fraction of the bonus lifetime already consumed, in `0.0..=1.0`.
    #[must_use]
    pub fn age_fraction(&self) -> f32 {
        if self.max_ticks == 0 {
            return 1.0;
        }
        (self.ticks_alive as f32 / self.max_ticks as f32).clamp(0.0, 1.0)
    }
}

/// Immutable representation of a single wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSnapshot {
    /// Identifier allocated to the wall.
    pub id: WallId,
    /// Cells covered by the wall.
    pub cells: [CellCoord; WALL_LENGTH],
    /// Current lifecycle stage.
    pub stage: WallStage,
    /// Progress through the current stage in `0.0..=1.0`; always `1.0` once landed.
    pub progress: f32,
}

/// Read-only snapshot of the simulation handed to presentation layers each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSnapshot {
    /// Board dimensions.
    pub board: Board,
    /// Active phase.
    pub phase: GamePhase,
    /// Difficulty of the current or most recent game.
    pub difficulty: Difficulty,
    /// Snake cells, head first.
    pub snake: Vec<CellCoord>,
    /// Direction committed on the most recent tick.
    pub heading: Direction,
    /// Current food cell, absent only after the board was cleared.
    pub food: Option<CellCoord>,
    /// Active bonus, if any.
    pub bonus: Option<BonusSnapshot>,
    /// Walls in identifier order.
    pub walls: Vec<WallSnapshot>,
    /// Current score.
    pub score: u32,
    /// Best score across sessions.
    pub best: u32,
    /// Ticks per second.
    pub speed: u32,
    /// Number of ticks simulated in the current game.
    pub tick: u64,
}

impl SimulationSnapshot {
    /// Head cell of the snake.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.snake.first().copied()
    }

    /// Reports whether a landed wall covers the provided cell.
    #[must_use]
    pub fn is_solid_wall(&self, cell: CellCoord) -> bool {
        self.walls
            .iter()
            .filter(|wall| wall.stage == WallStage::Landed)
            .any(|wall| wall.cells.contains(&cell))
    }
}
