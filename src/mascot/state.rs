//! Position & animation-state model.

use serde::{Deserialize, Serialize};

// ── Position ───────────────────────────────────────────

/// Screen position in viewport percentages (0–100 on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Build a position, clamping both axes into the viewport.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
        }
    }

    /// Euclidean distance in percentage units.
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when `other` lies inside the box `max_dx` × `max_dy` around `self`
    /// (strictly closer than both limits).
    pub fn is_near(&self, other: &Position, max_dx: f32, max_dy: f32) -> bool {
        (self.x - other.x).abs() < max_dx && (self.y - other.y).abs() < max_dy
    }

    pub fn in_viewport(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }
}

// ── Animation State ────────────────────────────────────

/// The animation the mascot is currently playing. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
    Running,
    Dancing,
    Celebrating,
    Waving,
    Sleeping,
    Laughing,
    Singing,
    Thinking,
    Surprised,
    Love,
    Jumping,
}

impl AnimationState {
    pub const ALL: [AnimationState; 13] = [
        AnimationState::Idle,
        AnimationState::Walking,
        AnimationState::Running,
        AnimationState::Dancing,
        AnimationState::Celebrating,
        AnimationState::Waving,
        AnimationState::Sleeping,
        AnimationState::Laughing,
        AnimationState::Singing,
        AnimationState::Thinking,
        AnimationState::Surprised,
        AnimationState::Love,
        AnimationState::Jumping,
    ];

    /// States the celebration trigger may land in.
    pub const CELEBRATORY: [AnimationState; 1] = [AnimationState::Celebrating];

    pub fn is_celebratory(self) -> bool {
        Self::CELEBRATORY.contains(&self)
    }

    pub fn is_moving(self) -> bool {
        matches!(self, AnimationState::Walking | AnimationState::Running)
    }

    /// CSS-friendly name used by renderers.
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Walking => "walking",
            AnimationState::Running => "running",
            AnimationState::Dancing => "dancing",
            AnimationState::Celebrating => "celebrating",
            AnimationState::Waving => "waving",
            AnimationState::Sleeping => "sleeping",
            AnimationState::Laughing => "laughing",
            AnimationState::Singing => "singing",
            AnimationState::Thinking => "thinking",
            AnimationState::Surprised => "surprised",
            AnimationState::Love => "love",
            AnimationState::Jumping => "jumping",
        }
    }
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
