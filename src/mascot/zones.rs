//! Safe-zone relocation — where the mascot may wander and how it gets there.
//!
//! The palette hugs the viewport edges so the mascot never parks on top of
//! the main content column.

use super::state::{AnimationState, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Edge-biased candidate positions.
pub const SAFE_ZONES: [Position; 14] = [
    Position { x: 5.0, y: 15.0 },
    Position { x: 5.0, y: 50.0 },
    Position { x: 5.0, y: 80.0 },
    Position { x: 15.0, y: 88.0 },
    Position { x: 30.0, y: 90.0 },
    Position { x: 50.0, y: 90.0 },
    Position { x: 70.0, y: 90.0 },
    Position { x: 85.0, y: 88.0 },
    Position { x: 92.0, y: 80.0 },
    Position { x: 92.0, y: 50.0 },
    Position { x: 92.0, y: 15.0 },
    Position { x: 80.0, y: 8.0 },
    Position { x: 50.0, y: 8.0 },
    Position { x: 20.0, y: 8.0 },
];

/// Candidates inside this box around the current position are skipped.
pub const NEAR_DX: f32 = 12.0;
pub const NEAR_DY: f32 = 8.0;

/// Pick a new target from `palette`, skipping spots too close to `from`.
///
/// If every candidate is too close the whole palette is used instead, and an
/// empty palette leaves the mascot where it is, so this never fails.
pub fn select_safe_position<R: Rng + ?Sized>(
    from: Position,
    palette: &[Position],
    rng: &mut R,
) -> Position {
    let candidates: Vec<&Position> = palette
        .iter()
        .filter(|p| !from.is_near(p, NEAR_DX, NEAR_DY))
        .collect();

    if let Some(target) = candidates.choose(rng) {
        return **target;
    }
    palette.choose(rng).copied().unwrap_or(from)
}

// ── Movement ───────────────────────────────────────────

/// Thresholds and speeds for turning a relocation into a walk or a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distances strictly above this run; anything else walks.
    pub run_distance: f32,
    /// Milliseconds per percentage unit when running.
    pub run_ms_per_unit: f32,
    /// Milliseconds per percentage unit when walking.
    pub walk_ms_per_unit: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            run_distance: 35.0,
            run_ms_per_unit: 40.0,
            walk_ms_per_unit: 60.0,
        }
    }
}

/// A planned move: the gait to animate and how long the trip takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub state: AnimationState,
    pub target: Position,
    pub distance: f32,
    pub duration: Duration,
}

pub fn classify_movement(from: Position, to: Position, config: &MovementConfig) -> Movement {
    let distance = from.distance_to(&to);
    let (state, ms_per_unit) = if distance > config.run_distance {
        (AnimationState::Running, config.run_ms_per_unit)
    } else {
        (AnimationState::Walking, config.walk_ms_per_unit)
    };
    Movement {
        state,
        target: to,
        distance,
        duration: Duration::from_millis((distance * ms_per_unit).round() as u64),
    }
}
