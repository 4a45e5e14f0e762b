//! Weighted-choice policy tables.
//!
//! The roaming policy is plain data: a list of `(action, weight)` rows
//! consumed by a generic selector, so it can be tuned from config and
//! tested without running the scheduler.

use super::state::AnimationState;
use crate::error::{MascotError, Result};
use serde::{Deserialize, Serialize};

// ── Weighted Table ─────────────────────────────────────

/// Cumulative-weight lookup over a fixed set of rows.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    rows: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedTable<T> {
    /// Build a table. Weights must be finite and non-negative, and at least
    /// one must be positive.
    pub fn new(rows: Vec<(T, f64)>) -> Result<Self> {
        if let Some((_, w)) = rows.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(MascotError::InvalidWeights(format!(
                "weight {} is negative or not finite",
                w
            )));
        }
        let total: f64 = rows.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(MascotError::InvalidWeights(
                "table has no positive weight".to_string(),
            ));
        }
        Ok(Self { rows, total })
    }

    /// Map a draw in `[0, 1)` onto a row. Out-of-range draws are clamped, so
    /// the result is a pure function of the draw.
    pub fn pick(&self, draw: f64) -> &T {
        let target = draw.clamp(0.0, 1.0) * self.total;
        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (i, (_, weight)) in self.rows.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = i;
            if target < cumulative {
                return &self.rows[i].0;
            }
        }
        // draw == 1.0 or float rounding at the top end
        &self.rows[last_positive].0
    }

    /// Normalized probability of each row, in table order.
    pub fn probabilities(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.rows.iter().map(move |(item, w)| (item, w / self.total))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Roaming Actions ────────────────────────────────────

/// What the fall-through roll can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoamAction {
    /// Play an animation in place.
    Perform(AnimationState),
    /// Move to a fresh safe-zone position.
    Relocate,
}

/// Weights for the fall-through roll. They need not sum to one; `idle` soaks
/// up whatever probability the others leave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyWeights {
    pub dance: f64,
    pub sing: f64,
    pub laugh: f64,
    pub think: f64,
    pub wave: f64,
    pub jump: f64,
    pub relocate: f64,
    pub celebrate: f64,
    pub idle: f64,
}

impl Default for PolicyWeights {
    fn default() -> Self {
        Self {
            dance: 0.08,
            sing: 0.06,
            laugh: 0.06,
            think: 0.08,
            wave: 0.07,
            jump: 0.05,
            relocate: 0.35,
            celebrate: 0.05,
            idle: 0.20,
        }
    }
}

impl PolicyWeights {
    pub fn to_table(&self) -> Result<WeightedTable<RoamAction>> {
        WeightedTable::new(vec![
            (RoamAction::Perform(AnimationState::Dancing), self.dance),
            (RoamAction::Perform(AnimationState::Singing), self.sing),
            (RoamAction::Perform(AnimationState::Laughing), self.laugh),
            (RoamAction::Perform(AnimationState::Thinking), self.think),
            (RoamAction::Perform(AnimationState::Waving), self.wave),
            (RoamAction::Perform(AnimationState::Jumping), self.jump),
            (RoamAction::Relocate, self.relocate),
            (RoamAction::Perform(AnimationState::Celebrating), self.celebrate),
            (RoamAction::Perform(AnimationState::Idle), self.idle),
        ])
    }
}

/// Actions picked uniformly when the mascot is over the moon.
pub const ELATED_ACTIONS: [AnimationState; 5] = [
    AnimationState::Celebrating,
    AnimationState::Dancing,
    AnimationState::Jumping,
    AnimationState::Laughing,
    AnimationState::Love,
];

pub fn elated_table() -> WeightedTable<AnimationState> {
    WeightedTable {
        rows: ELATED_ACTIONS.iter().map(|s| (*s, 1.0)).collect(),
        total: ELATED_ACTIONS.len() as f64,
    }
}
