#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-timestep clock that converts frame deltas into discrete simulation ticks.

use std::time::Duration;

use paper_snake_core::GamePhase;

/// Maximum number of ticks released for a single frame.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Discrete tick released by the stepper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickEvent {
    /// One-based sequence number of the tick since the stepper was created.
    pub index: u64,
}

/// Duration of a single step at the provided speed, expressed in ticks per second.
///
/// Returns `None` for a speed of zero, which never releases ticks.
#[must_use]
pub fn step_duration(speed: u32) -> Option<Duration> {
    if speed == 0 {
        return None;
    }
    Some(Duration::from_nanos(NANOS_PER_SECOND / u64::from(speed)))
}

/// Accumulates real time and releases ticks whenever a full step has elapsed.
#[derive(Debug, Default)]
pub struct Stepper {
    remainder: Duration,
    frame_ticks: u32,
    emitted: u64,
}

impl Stepper {
    /// Creates a stepper with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame by adding the elapsed time to the accumulator.
    ///
    /// Outside of [`GamePhase::Playing`] the accumulator is cleared instead so
    /// that resuming never releases a burst of stale ticks.
    pub fn accumulate(&mut self, dt: Duration, phase: GamePhase) {
        self.frame_ticks = 0;
        if phase != GamePhase::Playing {
            self.remainder = Duration::ZERO;
            return;
        }
        self.remainder = self.remainder.saturating_add(dt);
    }

    /// Releases the next tick of the current frame if a full step at `speed` has elapsed.
    ///
    /// Callers re-read the speed between ticks so that a speed change only
    /// affects the duration of later steps.
    pub fn next_tick(&mut self, speed: u32) -> Option<TickEvent> {
        let step = step_duration(speed)?;
        if self.remainder < step {
            return None;
        }
        if self.frame_ticks >= MAX_TICKS_PER_FRAME {
            self.remainder = below_one_step(self.remainder, step);
            return None;
        }

        self.remainder -= step;
        self.frame_ticks += 1;
        self.emitted = self.emitted.saturating_add(1);
        Some(TickEvent {
            index: self.emitted,
        })
    }

    /// Accumulates `dt` and drains every tick that fits at a constant `speed`.
    pub fn advance(&mut self, dt: Duration, speed: u32, phase: GamePhase) -> Vec<TickEvent> {
        self.accumulate(dt, phase);
        std::iter::from_fn(|| self.next_tick(speed)).collect()
    }

    /// Discards accumulated time, used when the phase leaves `Playing` mid-frame.
    pub fn halt(&mut self) {
        self.remainder = Duration::ZERO;
    }

    /// Time accumulated towards the next step.
    #[must_use]
    pub fn remainder(&self) -> Duration {
        self.remainder
    }

    /// Total number of ticks released since creation.
    #[must_use]
    pub fn ticks_emitted(&self) -> u64 {
        self.emitted
    }
}

fn below_one_step(remainder: Duration, step: Duration) -> Duration {
    let step_nanos = step.as_nanos();
    if step_nanos == 0 {
        return Duration::ZERO;
    }
    let leftover = remainder.as_nanos() % step_nanos;
    Duration::from_nanos(u64::try_from(leftover).unwrap_or(0))
}
