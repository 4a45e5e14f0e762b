//! Mood/energy ledger — three bounded attributes that drift every tick and
//! get nudged by whatever the mascot is doing.
//!
//! Every mutation goes through [`Ledger::adjust`], which clamps all three
//! values back into their ranges, so no sequence of updates can leave them
//! out of bounds.

use super::state::AnimationState;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ── Bounds ─────────────────────────────────────────────

pub const ENERGY_MIN: f32 = 0.0;
pub const ENERGY_MAX: f32 = 100.0;
pub const MOOD_MIN: f32 = 30.0;
pub const MOOD_MAX: f32 = 100.0;
pub const HAPPINESS_MIN: f32 = 40.0;
pub const HAPPINESS_MAX: f32 = 100.0;

// Per-tick drift amplitudes.
const ENERGY_DRAIN_MAX: f32 = 3.0;
const MOOD_WALK_SCALE: f32 = 8.0;
const HAPPINESS_WALK_SCALE: f32 = 6.0;

// ── Deltas ─────────────────────────────────────────────

/// A change to apply to the ledger. `restore_energy` refills energy to the
/// maximum before the other deltas are added.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerDelta {
    pub energy: f32,
    pub mood: f32,
    pub happiness: f32,
    pub restore_energy: bool,
}

impl LedgerDelta {
    pub const NONE: LedgerDelta = LedgerDelta {
        energy: 0.0,
        mood: 0.0,
        happiness: 0.0,
        restore_energy: false,
    };

    pub const fn new(energy: f32, mood: f32, happiness: f32) -> Self {
        Self {
            energy,
            mood,
            happiness,
            restore_energy: false,
        }
    }

    pub const fn restore() -> Self {
        Self {
            energy: 0.0,
            mood: 0.0,
            happiness: 0.0,
            restore_energy: true,
        }
    }
}

/// Extra cost (or reward) of performing `state`, on top of the tick drift.
pub fn action_cost(state: AnimationState) -> LedgerDelta {
    match state {
        AnimationState::Sleeping => LedgerDelta::restore(),
        AnimationState::Running => LedgerDelta::new(-4.0, 0.0, 0.0),
        AnimationState::Walking => LedgerDelta::new(-1.0, 0.0, 0.0),
        AnimationState::Dancing => LedgerDelta::new(-3.0, 0.0, 5.0),
        AnimationState::Jumping => LedgerDelta::new(-2.0, 0.0, 3.0),
        AnimationState::Celebrating => LedgerDelta::new(-2.0, 5.0, 8.0),
        AnimationState::Love => LedgerDelta::new(0.0, 3.0, 10.0),
        AnimationState::Laughing => LedgerDelta::new(-1.0, 4.0, 5.0),
        AnimationState::Singing => LedgerDelta::new(-1.0, 6.0, 3.0),
        AnimationState::Waving => LedgerDelta::new(-1.0, 0.0, 0.0),
        AnimationState::Idle
        | AnimationState::Thinking
        | AnimationState::Surprised => LedgerDelta::NONE,
    }
}

// ── Ledger ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    energy: f32,
    mood: f32,
    happiness: f32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            energy: ENERGY_MAX,
            mood: 75.0,
            happiness: 80.0,
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from raw values; out-of-range inputs are clamped.
    pub fn with_values(energy: f32, mood: f32, happiness: f32) -> Self {
        let mut ledger = Self {
            energy,
            mood,
            happiness,
        };
        ledger.clamp();
        ledger
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn mood(&self) -> f32 {
        self.mood
    }

    pub fn happiness(&self) -> f32 {
        self.happiness
    }

    /// Per-tick drift, applied whatever the mascot decides to do:
    /// energy drains by up to 3, mood and happiness random-walk
    /// (happiness with a slight upward bias).
    pub fn decay<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let drain = rng.gen_range(0.0..ENERGY_DRAIN_MAX);
        let mood_step = rng.gen_range(-0.4f32..0.4) * MOOD_WALK_SCALE;
        let happiness_step = rng.gen_range(-0.45f32..0.55) * HAPPINESS_WALK_SCALE;
        self.adjust(LedgerDelta::new(-drain, mood_step, happiness_step));
    }

    /// Apply the cost table entry for `state`.
    pub fn apply_action_cost(&mut self, state: AnimationState) {
        self.adjust(action_cost(state));
    }

    /// Apply an arbitrary delta, then clamp.
    pub fn adjust(&mut self, delta: LedgerDelta) {
        if delta.restore_energy {
            self.energy = ENERGY_MAX;
        }
        self.energy += delta.energy;
        self.mood += delta.mood;
        self.happiness += delta.happiness;
        self.clamp();
    }

    fn clamp(&mut self) {
        // NaN would slip through clamp; pin it to the floor instead.
        self.energy = clamp_or_min(self.energy, ENERGY_MIN, ENERGY_MAX);
        self.mood = clamp_or_min(self.mood, MOOD_MIN, MOOD_MAX);
        self.happiness = clamp_or_min(self.happiness, HAPPINESS_MIN, HAPPINESS_MAX);
    }

    pub fn in_bounds(&self) -> bool {
        (ENERGY_MIN..=ENERGY_MAX).contains(&self.energy)
            && (MOOD_MIN..=MOOD_MAX).contains(&self.mood)
            && (HAPPINESS_MIN..=HAPPINESS_MAX).contains(&self.happiness)
    }

    pub fn mood_label(&self) -> MoodLabel {
        if self.energy < 20.0 {
            MoodLabel::Exhausted
        } else if self.happiness > 90.0 && self.mood > 85.0 {
            MoodLabel::Ecstatic
        } else if self.energy < 40.0 {
            MoodLabel::Sleepy
        } else if self.mood < 45.0 {
            MoodLabel::Bored
        } else if self.happiness > 70.0 {
            MoodLabel::Happy
        } else {
            MoodLabel::Content
        }
    }

    /// Short human-readable summary for speech bubbles and logs.
    pub fn describe(&self) -> String {
        format!(
            "feeling {} (energy {:.0}, mood {:.0}, happiness {:.0})",
            self.mood_label(),
            self.energy,
            self.mood,
            self.happiness
        )
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            energy: self.energy,
            mood: self.mood,
            happiness: self.happiness,
            label: self.mood_label(),
        }
    }
}

fn clamp_or_min(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Serializable view of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub energy: f32,
    pub mood: f32,
    pub happiness: f32,
    pub label: MoodLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Exhausted,
    Sleepy,
    Bored,
    Content,
    Happy,
    Ecstatic,
}

impl std::fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MoodLabel::Exhausted => "exhausted",
            MoodLabel::Sleepy => "sleepy",
            MoodLabel::Bored => "bored",
            MoodLabel::Content => "content",
            MoodLabel::Happy => "happy",
            MoodLabel::Ecstatic => "ecstatic",
        };
        f.write_str(s)
    }
}
