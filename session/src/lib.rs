#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven game session wiring the world, the menu and the stepper together.
//!
//! Adapters call [`Session::frame`] once per rendered frame with the elapsed
//! time and the intents collected since the previous frame, then draw the
//! [`FrameSnapshot`] and react to the returned events.

use std::time::Duration;

use paper_snake_core::{Board, Command, Event, GamePhase, Intent, SimulationSnapshot};
use paper_snake_system_menu::{Menu, MenuItem};
use paper_snake_system_stepper::{Stepper, TickEvent};
use paper_snake_world::{self as world, query, World};
use thiserror::Error;

/// Key under which the best score is persisted.
pub const BEST_SCORE_KEY: &str = "paperSnakeBest";

/// Errors raised by best-score storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be reached at all.
    #[error("best score storage is unavailable: {0}")]
    Unavailable(String),
    /// The stored value is not a non-negative integer.
    #[error("stored best score {0:?} is not a non-negative integer")]
    Malformed(String),
    /// Reading or writing the backing file failed.
    #[error("best score storage I/O failed")]
    Io(#[from] std::io::Error),
}

/// Parses the string-encoded best score.
pub fn parse_best(raw: &str) -> Result<u32, StoreError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| StoreError::Malformed(raw.to_owned()))
}

/// Persistent storage for the best score.
pub trait BestScoreStore {
    /// Loads the stored best score, `None` when nothing was stored yet.
    fn load(&mut self) -> Result<Option<u32>, StoreError>;

    /// Stores a new best score.
    fn save(&mut self, best: u32) -> Result<(), StoreError>;
}

/// In-memory store used by tests and by adapters without persistent storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    best: Option<u32>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a best score.
    #[must_use]
    pub fn with_best(best: u32) -> Self {
        Self { best: Some(best) }
    }

    /// Value currently held by the store.
    #[must_use]
    pub fn stored(&self) -> Option<u32> {
        self.best
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<u32>, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        self.best = Some(best);
        Ok(())
    }
}

/// Parameters fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Board dimensions.
    pub board: Board,
    /// Seed for every random decision made by the world.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board: Board::default(),
            seed: 0x5eed,
        }
    }
}

/// Everything that happened during a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Events broadcast by the world in the order they occurred.
    pub events: Vec<Event>,
    /// Ticks released by the stepper.
    pub ticks: Vec<TickEvent>,
}

/// State a presentation layer needs to draw a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Simulation state.
    pub simulation: SimulationSnapshot,
    /// Menu of the current phase, empty while playing.
    pub menu: &'static [MenuItem],
    /// Index of the focused menu item.
    pub focus: usize,
    /// Indicates whether audio cues are muted.
    pub muted: bool,
}

/// Single-player game session.
#[derive(Debug)]
pub struct Session<S> {
    world: World,
    menu: Menu,
    stepper: Stepper,
    store: S,
    muted: bool,
    degraded: bool,
}

impl<S: BestScoreStore> Session<S> {
    /// Creates a session on the title screen, restoring the best score from `store`.
    ///
    /// Storage failures never abort the session: the best score is then
    /// tracked in memory only.
    pub fn new(config: SessionConfig, mut store: S) -> Self {
        let mut world = World::with_seed(config.seed);
        let mut events = Vec::new();
        if config.board != query::board(&world) {
            world::apply(
                &mut world,
                Command::ConfigureBoard {
                    board: config.board,
                },
                &mut events,
            );
        }

        let (best, degraded) = match store.load() {
            Ok(best) => (best.unwrap_or(0), false),
            Err(StoreError::Malformed(raw)) => {
                tracing::warn!(%raw, "ignoring malformed best score");
                (0, false)
            }
            Err(error) => {
                tracing::warn!(%error, "best score storage unavailable, tracking in memory");
                (0, true)
            }
        };
        world::apply(&mut world, Command::ConfigureBestScore { best }, &mut events);
        tracing::info!(
            best,
            columns = config.board.columns(),
            rows = config.board.rows(),
            "session ready"
        );

        Self {
            world,
            menu: Menu::new(),
            stepper: Stepper::new(),
            store,
            muted: false,
            degraded,
        }
    }

    /// Processes the intents gathered since the previous frame, then advances time by `dt`.
    pub fn frame(&mut self, dt: Duration, intents: &[Intent]) -> FrameReport {
        let mut report = FrameReport::default();

        for intent in intents {
            if *intent == Intent::MuteToggle {
                self.muted = !self.muted;
                tracing::debug!(muted = self.muted, "mute toggled");
                continue;
            }
            let mut commands = Vec::new();
            self.menu
                .handle(&[], std::slice::from_ref(intent), &mut commands);
            for command in commands {
                self.dispatch(command, &mut report.events);
            }
        }

        self.dispatch(Command::AdvanceTime { dt }, &mut report.events);

        self.stepper.accumulate(dt, query::phase(&self.world));
        while let Some(tick) = self.stepper.next_tick(query::speed(&self.world)) {
            self.dispatch(Command::Tick, &mut report.events);
            report.ticks.push(tick);
            if query::phase(&self.world) != GamePhase::Playing {
                self.stepper.halt();
                break;
            }
        }

        report
    }

    fn dispatch(&mut self, command: Command, out_events: &mut Vec<Event>) {
        let start = out_events.len();
        world::apply(&mut self.world, command, out_events);
        let emitted = &out_events[start..];

        for event in emitted {
            match event {
                Event::PhaseChanged { phase } => {
                    tracing::info!(?phase, score = query::score(&self.world), "phase changed");
                }
                Event::BestScoreImproved { best } => self.persist(*best),
                _ => {}
            }
        }

        let mut follow_up = Vec::new();
        self.menu.handle(emitted, &[], &mut follow_up);
        debug_assert!(follow_up.is_empty());
    }

    fn persist(&mut self, best: u32) {
        if self.degraded {
            return;
        }
        match self.store.save(best) {
            Ok(()) => tracing::debug!(best, "best score saved"),
            Err(error) => {
                tracing::warn!(%error, best, "failed to persist best score, tracking in memory");
                self.degraded = true;
            }
        }
    }

    /// Captures everything a presentation layer draws for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            simulation: query::snapshot(&self.world),
            menu: self.menu.items(),
            focus: self.menu.focus(),
            muted: self.muted,
        }
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current game phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Indicates whether audio cues are muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Indicates whether best-score persistence failed and the session fell back to memory.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Read-only access to the best-score store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
