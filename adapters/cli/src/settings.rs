//! Run configuration loaded from TOML and overridden by command-line flags.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use paper_snake_core::{Board, Difficulty, DEFAULT_COLUMNS, DEFAULT_ROWS};
use serde::Deserialize;

use crate::Args;

/// Settings for a headless run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) seed: u64,
    pub(crate) difficulty: Difficulty,
    pub(crate) frame_ms: u64,
    pub(crate) frames: u64,
    pub(crate) best_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            seed: 0x5eed,
            difficulty: Difficulty::Medium,
            frame_ms: 16,
            frames: 3_600,
            best_file: None,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    /// Replaces every value the command line provided explicitly.
    pub(crate) fn apply_overrides(&mut self, args: &Args) {
        if let Some(columns) = args.columns {
            self.columns = columns;
        }
        if let Some(rows) = args.rows {
            self.rows = rows;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(difficulty) = args.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(frame_ms) = args.frame_ms {
            self.frame_ms = frame_ms;
        }
        if let Some(frames) = args.frames {
            self.frames = frames;
        }
        if let Some(best_file) = &args.best_file {
            self.best_file = Some(best_file.clone());
        }
    }

    pub(crate) fn board(&self) -> Result<Board> {
        Board::new(self.columns, self.rows).context("invalid board dimensions")
    }

    pub(crate) fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}
