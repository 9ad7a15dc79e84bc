#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Paper Snake headlessly under an autopilot.

mod autopilot;
mod settings;
mod store;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use paper_snake_core::{DeathCause, Difficulty, Event};
use paper_snake_session::{BestScoreStore, MemoryStore, Session, SessionConfig};
use paper_snake_world::query;
use tracing_subscriber::EnvFilter;

use crate::{autopilot::Autopilot, settings::Settings, store::FileStore};

/// Headless Paper Snake runner.
#[derive(Debug, Parser)]
#[command(name = "paper-snake", version, about)]
pub(crate) struct Args {
    /// TOML settings file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty the autopilot selects on the title screen.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for every random decision of the simulation.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate.
    #[arg(long)]
    frames: Option<u64>,

    /// Simulated frame duration in milliseconds.
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Board width in cells.
    #[arg(long)]
    columns: Option<u32>,

    /// Board height in cells.
    #[arg(long)]
    rows: Option<u32>,

    /// JSON file holding the best score.
    #[arg(long)]
    best_file: Option<PathBuf>,

    /// Keep the best score in memory only.
    #[arg(long)]
    no_persist: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Totals gathered over a run.
#[derive(Debug, Default)]
struct Summary {
    games: u32,
    meals: u32,
    bonuses: u32,
    walls_landed: u32,
    boundary_deaths: u32,
    self_collisions: u32,
    wall_deaths: u32,
    boards_cleared: u32,
    top_score: u32,
}

impl Summary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::GameStarted { difficulty } => {
                self.games += 1;
                tracing::debug!(%difficulty, game = self.games, "game started");
            }
            Event::FoodEaten { score, .. } => {
                self.meals += 1;
                self.top_score = self.top_score.max(*score);
            }
            Event::BonusCollected { speed, .. } => {
                self.bonuses += 1;
                tracing::debug!(speed, "bonus collected");
            }
            Event::WallLanded { wall, .. } => {
                self.walls_landed += 1;
                tracing::debug!(wall = wall.get(), "wall landed");
            }
            Event::SnakeDied { cause, score } => {
                match cause {
                    DeathCause::Boundary => self.boundary_deaths += 1,
                    DeathCause::SelfCollision => self.self_collisions += 1,
                    DeathCause::Wall => self.wall_deaths += 1,
                }
                tracing::info!(?cause, score, "game over");
            }
            Event::BoardCleared { score } => {
                self.boards_cleared += 1;
                tracing::info!(score, "board cleared");
            }
            _ => {}
        }
    }
}

/// Entry point for the Paper Snake command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_overrides(&args);

    let config = SessionConfig {
        board: settings.board()?,
        seed: settings.seed,
    };

    if args.no_persist {
        return run(Session::new(config, MemoryStore::new()), &settings);
    }

    let path = match settings.best_file.clone() {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    let store = FileStore::new(path);
    tracing::debug!(path = %store.path().display(), "best score file");
    run(Session::new(config, store), &settings)
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{level}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!(error))
}

fn run<S: BestScoreStore>(mut session: Session<S>, settings: &Settings) -> Result<()> {
    println!("{}", query::welcome_banner(session.world()));

    let pilot = Autopilot::new(settings.difficulty);
    let dt = settings.frame_duration();
    let mut summary = Summary::default();
    let mut ticks = 0_u64;

    for _ in 0..settings.frames {
        let intents = pilot.intents(&session.snapshot());
        let report = session.frame(dt, &intents);
        ticks += report.ticks.len() as u64;
        for event in &report.events {
            summary.record(event);
        }
    }

    let snapshot = session.snapshot().simulation;
    println!(
        "frames: {}, ticks: {ticks}, games: {}, phase: {:?}",
        settings.frames, summary.games, snapshot.phase
    );
    println!(
        "meals: {}, bonuses: {}, walls landed: {}, boards cleared: {}",
        summary.meals, summary.bonuses, summary.walls_landed, summary.boards_cleared
    );
    println!(
        "deaths: boundary {}, self {}, wall {}",
        summary.boundary_deaths, summary.self_collisions, summary.wall_deaths
    );
    println!(
        "top score this run: {}, best score: {}{}",
        summary.top_score,
        snapshot.best,
        if session.is_degraded() {
            " (not persisted)"
        } else {
            ""
        }
    );
    Ok(())
}
