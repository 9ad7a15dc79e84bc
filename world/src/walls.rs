//! Falling wall lifecycle and placement.

use std::{collections::BTreeMap, time::Duration};

use paper_snake_core::{
    CellCoord, DifficultyProfile, Direction, Event, WallId, WallSnapshot, WallStage,
    WALL_FALL_DURATION, WALL_LENGTH,
};
use rand::Rng;

use crate::grid::Occupancy;

/// Closest distance ahead of the head at which a wall may be centred.
const MIN_AHEAD: u32 = 5;
/// Furthest distance ahead of the head at which a wall may be centred.
const MAX_AHEAD: u32 = 8;
/// Cells a wall must keep free between itself and the board edge.
const EDGE_MARGIN: u32 = 2;
/// Chebyshev distance within which two walls' cells may not lie.
const WALL_SPACING: u32 = 2;

/// Lifecycle of a single wall with the time spent in the active stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WallPhase {
    Warning { elapsed: Duration },
    Falling { elapsed: Duration },
    Landed,
}

impl WallPhase {
    fn stage(self) -> WallStage {
        match self {
            Self::Warning { .. } => WallStage::Warning,
            Self::Falling { .. } => WallStage::Falling,
            Self::Landed => WallStage::Landed,
        }
    }

    fn progress(self, warning: Duration) -> f32 {
        match self {
            Self::Warning { elapsed } => fraction(elapsed, warning),
            Self::Falling { elapsed } => fraction(elapsed, WALL_FALL_DURATION),
            Self::Landed => 1.0,
        }
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

/// Wall stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct WallState {
    pub(crate) cells: [CellCoord; WALL_LENGTH],
    pub(crate) phase: WallPhase,
}

/// Registry that stores walls and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct WallRegistry {
    entries: BTreeMap<WallId, WallState>,
    next_wall_id: WallId,
}

impl WallRegistry {
    /// Creates an empty wall registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_wall_id: WallId::new(0),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_wall_id = WallId::new(0);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Inserts a wall in its warning stage and returns its identifier.
    pub(crate) fn insert(&mut self, cells: [CellCoord; WALL_LENGTH]) -> WallId {
        let id = self.next_wall_id;
        self.next_wall_id = WallId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            WallState {
                cells,
                phase: WallPhase::Warning {
                    elapsed: Duration::ZERO,
                },
            },
        );
        id
    }

    /// Reports whether a landed wall covers the cell.
    pub(crate) fn is_solid(&self, cell: CellCoord) -> bool {
        self.entries
            .values()
            .any(|wall| wall.phase == WallPhase::Landed && wall.cells.contains(&cell))
    }

    /// Reports whether any wall covers the cell, whatever its stage.
    pub(crate) fn covers(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|wall| wall.cells.contains(&cell))
    }

    /// Reports whether the cell lies within `spacing` (Chebyshev) of any wall cell.
    pub(crate) fn crowds(&self, cell: CellCoord, spacing: u32) -> bool {
        self.entries
            .values()
            .flat_map(|wall| wall.cells.iter())
            .any(|other| other.chebyshev_distance(cell) <= spacing)
    }

    /// Advances every wall's stage timer, emitting stage transition events.
    ///
    /// A single large delta may carry a wall through both transitions.
    pub(crate) fn advance(&mut self, dt: Duration, warning: Duration, out: &mut Vec<Event>) {
        for (id, wall) in self.entries.iter_mut() {
            let mut budget = dt;
            loop {
                match wall.phase {
                    WallPhase::Warning { elapsed } => {
                        let elapsed = elapsed.saturating_add(budget);
                        if elapsed < warning {
                            wall.phase = WallPhase::Warning { elapsed };
                            break;
                        }
                        budget = elapsed - warning;
                        wall.phase = WallPhase::Falling {
                            elapsed: Duration::ZERO,
                        };
                        out.push(Event::WallFalling { wall: *id });
                    }
                    WallPhase::Falling { elapsed } => {
                        let elapsed = elapsed.saturating_add(budget);
                        if elapsed < WALL_FALL_DURATION {
                            wall.phase = WallPhase::Falling { elapsed };
                            break;
                        }
                        wall.phase = WallPhase::Landed;
                        tracing::debug!(wall = id.get(), "wall landed");
                        out.push(Event::WallLanded {
                            wall: *id,
                            cells: wall.cells,
                        });
                        break;
                    }
                    WallPhase::Landed => break,
                }
            }
        }
    }

    /// Captures snapshots in identifier order.
    pub(crate) fn snapshots(&self, warning: Duration) -> Vec<WallSnapshot> {
        self.entries
            .iter()
            .map(|(id, wall)| WallSnapshot {
                id: *id,
                cells: wall.cells,
                stage: wall.phase.stage(),
                progress: wall.phase.progress(warning),
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: WallId) -> Option<&WallState> {
        self.entries.get(&id)
    }
}

/// Projects a wall ahead of the head, perpendicular to its heading.
///
/// Returns `None` when the projected line violates the edge margin, overlaps
/// the snake, food or bonus, or crowds an existing wall.
pub(crate) fn plan_wall<R: Rng>(
    occupancy: &Occupancy<'_>,
    head: CellCoord,
    heading: Direction,
    rng: &mut R,
) -> Option<[CellCoord; WALL_LENGTH]> {
    let distance = rng.gen_range(MIN_AHEAD..=MAX_AHEAD);
    let center = head.translate(heading, distance)?;
    let [before, after] = heading.perpendicular();
    let cells = [center.step(before)?, center, center.step(after)?];

    let acceptable = cells.iter().all(|cell| {
        occupancy.board.keeps_margin(*cell, EDGE_MARGIN)
            && !occupancy.blocks_wall(*cell)
            && !occupancy.walls.crowds(*cell, WALL_SPACING)
    });
    acceptable.then_some(cells)
}

/// Ticks until the next wall attempt: `round(speed * (lo + r * (hi - lo)))`.
pub(crate) fn spawn_interval<R: Rng>(profile: &DifficultyProfile, speed: u32, rng: &mut R) -> i64 {
    let low = f64::from(profile.wall_interval_min);
    let high = f64::from(profile.wall_interval_max);
    let seconds = low + rng.gen::<f64>() * (high - low);
    (f64::from(speed) * seconds).round() as i64
}
